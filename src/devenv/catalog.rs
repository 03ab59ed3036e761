use crate::error::{MaintError, Result};
use std::collections::HashSet;

/// 패키지 설치 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSource {
    /// 공식 저장소 (pacman)
    Official,
    /// AUR (yay)
    Aur,
}

impl InstallSource {
    pub fn label(&self) -> &'static str {
        match self {
            InstallSource::Official => "official repositories",
            InstallSource::Aur => "AUR",
        }
    }
}

/// 설치 후 추가 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostInstall {
    /// nvm으로 Node.js LTS 설치
    Nvm,
    /// docker 서비스 활성화 + docker 그룹 추가
    Docker,
    /// initdb + 서비스 활성화
    Postgres,
    /// 데이터 디렉터리 + 서비스 활성화
    MongoDb,
}

#[derive(Debug, Clone)]
pub struct Tool {
    pub key: String,
    pub name: String,
    pub description: String,
    pub package: String,
    pub source: InstallSource,
    pub post_install: Option<PostInstall>,
}

impl Tool {
    pub fn official(key: &str, name: &str, description: &str, package: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            package: package.to_string(),
            source: InstallSource::Official,
            post_install: None,
        }
    }

    pub fn aur(key: &str, name: &str, description: &str, package: &str) -> Self {
        Self {
            source: InstallSource::Aur,
            ..Self::official(key, name, description, package)
        }
    }

    pub fn with_post_install(mut self, post_install: PostInstall) -> Self {
        self.post_install = Some(post_install);
        self
    }
}

/// 순서가 있는 설치 가능 도구 목록
///
/// 생성 시 키 중복, 빈 키, 빈 패키지 이름을 검사합니다.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<Tool>) -> Result<Self> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if tool.key.trim().is_empty() {
                return Err(MaintError::InvalidCatalog(format!(
                    "tool '{}' has an empty key",
                    tool.name
                )));
            }
            if tool.package.trim().is_empty() {
                return Err(MaintError::InvalidCatalog(format!(
                    "tool '{}' has an empty package name",
                    tool.key
                )));
            }
            if !seen.insert(tool.key.as_str()) {
                return Err(MaintError::InvalidCatalog(format!(
                    "duplicate tool key '{}'",
                    tool.key
                )));
            }
        }
        Ok(Self { tools })
    }

    /// 기본 개발 도구 목록 (고정 테이블, 테스트에서 검증)
    pub fn default_catalog() -> Self {
        Self::new(vec![
            Tool::aur(
                "nvm",
                "NVM (Node Version Manager)",
                "Node.js version manager for easy Node.js installation",
                "nvm",
            )
            .with_post_install(PostInstall::Nvm),
            Tool::official(
                "nodejs",
                "Node.js",
                "JavaScript runtime for server-side development",
                "nodejs",
            ),
            Tool::official(
                "vscode",
                "Visual Studio Code",
                "Powerful code editor with extensive extensions",
                "code",
            ),
            Tool::official(
                "docker",
                "Docker",
                "Container platform for application deployment",
                "docker",
            )
            .with_post_install(PostInstall::Docker),
            Tool::official("git", "Git", "Distributed version control system", "git"),
            Tool::official(
                "python",
                "Python",
                "Python programming language and tools",
                "python",
            ),
            Tool::official(
                "uv",
                "UV (Python Package Manager)",
                "Fast Python package installer and resolver",
                "uv",
            ),
            Tool::official(
                "postgresql",
                "PostgreSQL",
                "Advanced open source database",
                "postgresql",
            )
            .with_post_install(PostInstall::Postgres),
            Tool::official("redis", "Redis", "In-memory data structure store", "redis"),
            // 공식 저장소에는 없음
            Tool::aur(
                "mongodb",
                "MongoDB",
                "Document-oriented NoSQL database",
                "mongodb-bin",
            )
            .with_post_install(PostInstall::MongoDb),
        ])
        .expect("built-in tool catalog has unique, non-empty keys")
    }

    pub fn get(&self, key: &str) -> Result<&Tool> {
        self.tools
            .iter()
            .find(|tool| tool.key == key)
            .ok_or_else(|| MaintError::UnknownTool(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}
