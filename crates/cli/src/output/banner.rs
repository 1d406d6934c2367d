use colored::Colorize;

const LOGO: &[&str] = &[
    r"    ___ _                 _ _                  ",
    r"   / __| |___ _  _ __| | |/ /___ ___ _ __     ",
    r"  | (__| / _ \ || / _` | ' </ -_) -_) '_ \    ",
    r"   \___|_\___/\_,_\__,_|_|\_\___\___| .__/    ",
    r"                                    |_|       ",
    r"      ░░ lifecycle tiering · idle-instance alarms ░░",
];

pub fn print_banner() {
    let colors = [
        colored::Color::Cyan,
        colored::Color::Cyan,
        colored::Color::BrightCyan,
        colored::Color::BrightWhite,
        colored::Color::Cyan,
        colored::Color::BrightBlack,
    ];

    for (line, &color) in LOGO.iter().zip(colors.iter()) {
        println!("{}", line.color(color).bold());
    }
}

pub fn print_version_block(version: &str) {
    print_banner();
    println!();
    println!("  {} {}", "Version".dimmed(), version.bright_cyan().bold());
    println!(
        "  {} {}",
        "  Arch ".dimmed(),
        std::env::consts::ARCH.bright_white()
    );
    println!(
        "  {} {}",
        "    OS ".dimmed(),
        std::env::consts::OS.bright_white()
    );
    println!();
}
