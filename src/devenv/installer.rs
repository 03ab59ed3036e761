use super::catalog::{InstallSource, PostInstall, Tool, ToolCatalog};
use crate::error::{MaintError, Result};
use crate::executor::{CommandRunner, ExecutionResult};
use crate::orchestrator::{Operation, Task};
use async_trait::async_trait;
use colored::*;
use std::path::Path;
use std::sync::Arc;

/// AUR nvm 패키지의 초기화 스크립트
const NVM_INIT: &str = "/usr/share/nvm/init-nvm.sh";
const POSTGRES_DATA: &str = "/var/lib/postgres/data";

/// 개발 도구 설치기
pub struct Installer {
    catalog: ToolCatalog,
    /// sudo를 실행한 사용자 (AUR 빌드는 root로 할 수 없음)
    sudo_user: Option<String>,
    /// 로그인 사용자 (SUDO_USER가 없을 때 docker 그룹 대상)
    login_user: Option<String>,
}

impl Installer {
    pub fn new(catalog: ToolCatalog) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            sudo_user: non_root_env("SUDO_USER"),
            login_user: non_root_env("USER"),
        })
    }

    pub fn with_users(
        catalog: ToolCatalog,
        sudo_user: Option<&str>,
        login_user: Option<&str>,
    ) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            sudo_user: sudo_user.map(str::to_string),
            login_user: login_user.map(str::to_string),
        })
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// `pacman -Q`로 설치 여부 확인
    pub async fn is_installed(&self, tool: &Tool, runner: &CommandRunner) -> Result<bool> {
        match runner.probe(&format!("pacman -Q {}", tool.package)).await {
            Ok(output) => Ok(output.success()),
            Err(MaintError::Interrupted) => Err(MaintError::Interrupted),
            Err(e) => {
                tracing::debug!(package = %tool.package, error = %e, "install probe failed");
                Ok(false)
            }
        }
    }

    pub async fn install(&self, key: &str, runner: &CommandRunner) -> Result<bool> {
        let tool = self.catalog.get(key)?;
        self.install_tool(tool, runner).await
    }

    /// 도구 하나 설치 (이미 설치되어 있으면 성공)
    pub async fn install_tool(&self, tool: &Tool, runner: &CommandRunner) -> Result<bool> {
        if self.is_installed(tool, runner).await? {
            println!("{} {} is already installed", "[i]".cyan(), tool.name);
            return Ok(true);
        }

        println!("{} Installing {}...", "[>>]".cyan(), tool.name.bold());
        let description = format!("Installing {} from {}", tool.name, tool.source.label());
        let result = runner
            .execute(&self.install_command(tool), Some(&description))
            .await?;

        let action = format!("Install {}", tool.name);
        if !result.succeeded() {
            runner
                .log()
                .record_with_details(&action, false, &failure_detail(&result))?;
            return Ok(false);
        }
        runner.log().record(&action, true)?;

        if let Some(post_install) = tool.post_install {
            println!(
                "{} Running post-install setup for {}...",
                "[>>]".cyan(),
                tool.name
            );
            // 후속 설정 실패는 설치 실패로 치지 않음
            if let Some(detail) = self.post_install(post_install, runner).await? {
                println!(
                    "{} Post-install setup failed: {}",
                    "[!]".yellow(),
                    detail
                );
                runner.log().record_with_details(
                    &format!("Post-install setup {}", tool.name),
                    false,
                    &detail,
                )?;
            }
        }

        Ok(true)
    }

    pub fn install_command(&self, tool: &Tool) -> String {
        match (tool.source, &self.sudo_user) {
            (InstallSource::Official, _) => {
                format!("pacman -S --noconfirm {}", tool.package)
            }
            (InstallSource::Aur, Some(user)) => {
                format!("sudo -u {} yay -S --noconfirm {}", user, tool.package)
            }
            (InstallSource::Aur, None) => format!("yay -S --noconfirm {}", tool.package),
        }
    }

    /// 후속 설정 실행, 실패하면 원인 반환
    async fn post_install(
        &self,
        post_install: PostInstall,
        runner: &CommandRunner,
    ) -> Result<Option<String>> {
        match post_install {
            PostInstall::Nvm => {
                if !Path::new(NVM_INIT).exists() {
                    println!("    {} {} not found, skipping Node.js LTS", "[i]".cyan(), NVM_INIT);
                    return Ok(None);
                }
                let script = format!("source {} && nvm install --lts", NVM_INIT);
                let command = match &self.sudo_user {
                    Some(user) => format!("sudo -u {} bash -c '{}'", user, script),
                    None => script,
                };
                let result = runner
                    .execute(&command, Some("Installing latest LTS Node.js"))
                    .await?;
                Ok(failed(&result))
            }
            PostInstall::Docker => {
                let service = runner
                    .execute("systemctl enable --now docker", Some("Enabling Docker service"))
                    .await?;
                if let Some(detail) = failed(&service) {
                    return Ok(Some(detail));
                }
                let Some(user) = self.sudo_user.as_ref().or(self.login_user.as_ref()) else {
                    println!("    {} Could not determine user for docker group", "[!]".yellow());
                    return Ok(None);
                };
                let group = runner
                    .execute(
                        &format!("usermod -aG docker {}", user),
                        Some(&format!("Adding {} to docker group", user)),
                    )
                    .await?;
                if group.succeeded() {
                    println!(
                        "    {} Log out and back in for docker group changes to take effect",
                        "[i]".cyan()
                    );
                }
                Ok(failed(&group))
            }
            PostInstall::Postgres => {
                if Path::new(POSTGRES_DATA).join("PG_VERSION").exists() {
                    println!("    {} PostgreSQL data directory already initialized", "[i]".cyan());
                } else {
                    let init = runner
                        .execute(
                            &format!("sudo -u postgres initdb -D {}", POSTGRES_DATA),
                            Some("Initializing PostgreSQL database"),
                        )
                        .await?;
                    if let Some(detail) = failed(&init) {
                        return Ok(Some(detail));
                    }
                }
                let service = runner
                    .execute(
                        "systemctl enable --now postgresql",
                        Some("Enabling PostgreSQL service"),
                    )
                    .await?;
                if service.succeeded() {
                    println!(
                        "    {} Use 'sudo -u postgres psql' to connect",
                        "[i]".cyan()
                    );
                }
                Ok(failed(&service))
            }
            PostInstall::MongoDb => {
                let data_dir = runner
                    .execute(
                        "mkdir -p /var/lib/mongodb",
                        Some("Creating MongoDB data directory"),
                    )
                    .await?;
                if let Some(detail) = failed(&data_dir) {
                    return Ok(Some(detail));
                }
                let service = runner
                    .execute("systemctl enable --now mongodb", Some("Enabling MongoDB service"))
                    .await?;
                Ok(failed(&service))
            }
        }
    }

    /// 도구별 설치 상태
    pub async fn status<'a>(&'a self, runner: &CommandRunner) -> Result<Vec<(&'a Tool, bool)>> {
        let mut status = Vec::with_capacity(self.catalog.len());
        for tool in self.catalog.iter() {
            status.push((tool, self.is_installed(tool, runner).await?));
        }
        Ok(status)
    }

    pub fn task(self: &Arc<Self>, key: &str) -> Result<Task> {
        let tool = self.catalog.get(key)?;
        Ok(Task::new(
            format!("Install {}", tool.name),
            InstallStep {
                installer: Arc::clone(self),
                key: tool.key.clone(),
            },
        )
        .with_description(tool.description.clone()))
    }

    /// 선택한 도구들의 설치 계획 (알 수 없는 키가 있으면 에러)
    pub fn plan(self: &Arc<Self>, keys: &[String]) -> Result<Vec<Task>> {
        keys.iter().map(|key| self.task(key)).collect()
    }

    pub fn install_all_plan(self: &Arc<Self>) -> Vec<Task> {
        self.catalog
            .iter()
            .filter_map(|tool| self.task(&tool.key).ok())
            .collect()
    }
}

struct InstallStep {
    installer: Arc<Installer>,
    key: String,
}

#[async_trait]
impl Operation for InstallStep {
    async fn run(&self, runner: &CommandRunner) -> Result<bool> {
        self.installer.install(&self.key, runner).await
    }
}

fn non_root_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|user| !user.is_empty() && user != "root")
}

fn failed(result: &ExecutionResult) -> Option<String> {
    if result.succeeded() {
        None
    } else {
        Some(failure_detail(result))
    }
}

/// 로그에 남길 실패 원인 (stderr 마지막 줄 또는 에러 메시지)
pub fn failure_detail(result: &ExecutionResult) -> String {
    result
        .stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .or_else(|| result.error().map(|e| e.to_string()))
        .unwrap_or_else(|| "unknown error".to_string())
}

/// `id -u`로 root 권한 확인
pub async fn ensure_root(runner: &CommandRunner) -> Result<()> {
    let output = runner.probe("id -u").await?;
    if output.success() && output.stdout.trim() == "0" {
        Ok(())
    } else {
        Err(MaintError::NotRoot("devenv".to_string()))
    }
}

/// Arch 계열 시스템인지 확인
pub fn is_arch_linux() -> bool {
    sysinfo::System::distribution_id() == "arch" || which::which("pacman").is_ok()
}
