use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// 스피너 스타일 (명령어 실행 중)
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// 명령어 실행 중 표시되는 장식용 스피너
///
/// 결과에 영향을 주지 않습니다. `stop()` 또는 drop 시 tick 스레드를 join하고 줄을 지우므로,
/// 어떤 경로로 빠져나가도 이후 출력과 섞이지 않습니다.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        Self {
            bar: create_spinner(message),
        }
    }

    /// 아무것도 그리지 않는 스피너
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn stop(self) {}

    pub fn is_running(&self) -> bool {
        !self.bar.is_finished()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.disable_steady_tick();
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
