use crate::logging::LogLevel;
use crate::maintenance::MaintenanceKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "archmaint")]
#[command(version)]
#[command(about = "Arch Linux system maintenance", long_about = None)]
#[command(after_help = "Run without options for the interactive menu.")]
pub struct MaintenanceCli {
    /// 전체 유지보수 실행
    #[arg(long)]
    pub full: bool,

    /// pacman 시스템 업데이트
    #[arg(long)]
    pub update: bool,

    /// AUR 패키지 업데이트 (yay)
    #[arg(long)]
    pub aur: bool,

    /// 패키지 캐시와 고아 패키지 정리
    #[arg(long)]
    pub clean: bool,

    /// 오래된 systemd 저널 정리
    #[arg(long)]
    pub logs: bool,

    /// 시스템 상태 점검
    #[arg(long)]
    pub health: bool,

    /// 디스크 사용량 분석
    #[arg(long)]
    pub disk: bool,

    /// locate 데이터베이스 업데이트
    #[arg(long)]
    pub locate: bool,

    /// 로그 파일 상태 출력
    #[arg(long)]
    pub status: bool,

    /// 실행할 작업만 출력
    #[arg(long)]
    pub dry_run: bool,

    /// 디버그 로그 출력 (--log-level debug와 같음)
    #[arg(short, long)]
    pub verbose: bool,

    /// 진단 로그 레벨
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// 설정 파일 경로 (기본: ~/.archmaint/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl MaintenanceCli {
    /// 개별 작업 플래그를 고정된 순서로 변환
    pub fn selected(&self) -> Vec<MaintenanceKind> {
        [
            (self.update, MaintenanceKind::SystemUpdate),
            (self.clean, MaintenanceKind::PackageCache),
            (self.aur, MaintenanceKind::AurUpdate),
            (self.logs, MaintenanceKind::JournalCleanup),
            (self.locate, MaintenanceKind::LocateDatabase),
            (self.health, MaintenanceKind::HealthCheck),
            (self.disk, MaintenanceKind::DiskUsage),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }

    /// 아무 작업도 지정하지 않았으면 대화형 메뉴
    pub fn is_interactive(&self) -> bool {
        !self.full && !self.status && self.selected().is_empty()
    }
}

#[derive(Parser, Debug)]
#[command(name = "devenv")]
#[command(version)]
#[command(about = "Developer environment setup for Arch Linux", long_about = None)]
#[command(after_help = "Run without options for the interactive menu.")]
pub struct DevEnvCli {
    /// 모든 도구 설치
    #[arg(long)]
    pub all: bool,

    /// 지정한 도구 설치 (반복 가능, 예: --install git --install docker)
    #[arg(long, value_name = "KEY")]
    pub install: Vec<String>,

    /// 설치 가능한 도구 목록
    #[arg(long)]
    pub list: bool,

    /// 설치 상태 출력
    #[arg(long)]
    pub status: bool,

    /// 설치 로그 출력
    #[arg(long)]
    pub log: bool,

    /// 실행할 작업만 출력
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl DevEnvCli {
    pub fn is_interactive(&self) -> bool {
        !self.all && self.install.is_empty() && !self.list && !self.status && !self.log
    }
}
