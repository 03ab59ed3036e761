/// 위험 명령어 검사기
///
/// 셸 문법을 해석하지 않는 단순 부분 문자열 검사입니다.
/// 따옴표나 변수로 우회될 수 있고, `rm -rf /tmp/x`처럼 무해한 명령어도 걸릴 수 있습니다.
pub struct CommandValidator;

impl CommandValidator {
    const DANGEROUS_PATTERNS: &'static [&'static str] = &[
        "rm -rf /",
        "rm -rf /*",
        "rm -rf /home",
        "rm -rf /etc",
        "dd if=",
        "mkfs",
        "fdisk",
        "parted",
        "wipefs",
        "chmod 777",
        "chown root",
        "chmod +s",
        "chmod +t",
    ];

    pub fn new() -> Self {
        Self
    }

    /// 명령어에 포함된 첫 번째 위험 패턴 반환
    pub fn find_dangerous_pattern(&self, command: &str) -> Option<&'static str> {
        Self::DANGEROUS_PATTERNS
            .iter()
            .copied()
            .find(|pattern| command.contains(pattern))
    }

    pub fn is_dangerous(&self, command: &str) -> bool {
        self.find_dangerous_pattern(command).is_some()
    }
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 확인 프롬프트 응답 판정: 정확히 "yes" (대소문자 무시)만 승인
pub fn is_affirmative(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("yes")
}
