use crate::error::Result;
use crate::executor::CommandRunner;
use async_trait::async_trait;

/// 작업이 수행하는 동작
///
/// `Ok(true)` 성공, `Ok(false)` 실패, `Err(Interrupted)`는 전체 실행 중단,
/// 그 밖의 `Err`는 해당 작업만 실패로 처리됩니다.
#[async_trait]
pub trait Operation: Send + Sync {
    async fn run(&self, runner: &CommandRunner) -> Result<bool>;
}

/// 인자 없는 함수를 `Operation`으로 감싸기
pub struct FnOperation<F>(pub F);

#[async_trait]
impl<F> Operation for FnOperation<F>
where
    F: Fn() -> Result<bool> + Send + Sync,
{
    async fn run(&self, _runner: &CommandRunner) -> Result<bool> {
        (self.0)()
    }
}

/// 실행 작업 단위
pub struct Task {
    /// 표시 이름
    pub name: String,
    /// 작업 설명
    pub description: String,
    /// 실패 시 요약에 따로 표시할지 여부 (실행 중단과는 무관)
    pub critical: bool,
    pub operation: Box<dyn Operation>,
}

impl Task {
    pub fn new(name: impl Into<String>, operation: impl Operation + 'static) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            critical: false,
            operation: Box::new(operation),
        }
    }

    /// 인자 없는 함수로 작업 생성
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Result<bool> + Send + Sync + 'static,
    {
        Self::new(name, FnOperation(f))
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("critical", &self.critical)
            .finish_non_exhaustive()
    }
}
