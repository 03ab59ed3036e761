use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// 종료된 프로세스의 출력
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// 시그널로 종료된 경우 None
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// 셸 명령어 실행기
///
/// 테스트에서는 실제 프로세스 대신 목(mock) 구현을 주입합니다.
/// 반환된 future가 drop되면 실행 중인 프로세스도 종료되어야 합니다.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn launch(&self, command: &str) -> std::io::Result<ProcessOutput>;
}

/// `bash -c <command>` 실행기
pub struct BashLauncher;

impl BashLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BashLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessLauncher for BashLauncher {
    async fn launch(&self, command: &str) -> std::io::Result<ProcessOutput> {
        // sudo/pacman 프롬프트에 응답할 수 있도록 stdin은 상속
        let output = Command::new("bash")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
