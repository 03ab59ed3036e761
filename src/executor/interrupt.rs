use async_trait::async_trait;

/// 사용자 인터럽트 신호원
///
/// `interrupted()`는 인터럽트가 발생하면 완료되는 future입니다.
#[async_trait]
pub trait InterruptSource: Send + Sync {
    async fn interrupted(&self);
}

/// Ctrl-C (SIGINT)
pub struct CtrlC;

#[async_trait]
impl InterruptSource for CtrlC {
    async fn interrupted(&self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

/// 절대 발생하지 않는 인터럽트 (테스트, 비대화형 실행용)
pub struct NeverInterrupt;

#[async_trait]
impl InterruptSource for NeverInterrupt {
    async fn interrupted(&self) {
        std::future::pending::<()>().await;
    }
}
