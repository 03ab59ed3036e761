pub mod catalog;
pub mod installer;

pub use catalog::{InstallSource, PostInstall, Tool, ToolCatalog};
pub use installer::{ensure_root, is_arch_linux, Installer};

use crate::ui::report::{print_section, rule};
use colored::*;

/// 설치 가능한 도구 목록 출력
pub fn print_catalog(catalog: &ToolCatalog) {
    print_section("AVAILABLE DEVELOPMENT TOOLS");
    for (i, tool) in catalog.iter().enumerate() {
        let source = match tool.source {
            InstallSource::Official => "".normal(),
            InstallSource::Aur => " [AUR]".magenta(),
        };
        println!("  {:2}. {}{} ({})", i + 1, tool.name.bold(), source, tool.key);
        println!("      {}", tool.description.dimmed());
    }
    println!("{}", rule(60));
}

/// 설치 상태 출력
pub fn print_status(status: &[(&Tool, bool)]) {
    print_section("INSTALLATION STATUS");
    for (tool, installed) in status {
        let label = if *installed {
            "[OK] Installed".green()
        } else {
            "[ ] Not installed".dimmed()
        };
        println!("  {:<30} {}", tool.name, label);
    }
    let installed = status.iter().filter(|(_, installed)| *installed).count();
    println!(
        "\n  Progress: {}/{} tools installed",
        installed,
        status.len()
    );
    println!("{}", rule(60));
}
