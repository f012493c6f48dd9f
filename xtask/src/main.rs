//! Build automation tasks for the network alarm clock.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

const FIRMWARE: &str = "alarm_clock";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the network alarm clock", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: host tests, library and firmware builds, docs
    CheckAll,
    /// Build library with specified features
    Build {
        #[arg(long, default_value = "pico1")]
        board: Board,
        #[arg(long)]
        wifi: bool,
    },
    /// Run the host tests (no board features)
    Test,
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        #[arg(long, default_value = "pico1")]
        board: Board,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Board {
    Pico1,
    Pico2,
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::Pico1 => write!(f, "pico1"),
            Board::Pico2 => write!(f, "pico2"),
        }
    }
}

impl Board {
    fn target(self) -> &'static str {
        match self {
            Board::Pico1 => "thumbv6m-none-eabi",
            Board::Pico2 => "thumbv8m.main-none-eabihf",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Build { board, wifi } => build_lib(board, wifi),
        Commands::Test => {
            if run_host_tests() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Uf2 { board } => build_uf2(board),
    }
}

fn check_all() -> ExitCode {
    let workspace_root = workspace_root();

    println!("{}", "==> Running host tests...".cyan());
    if !run_host_tests() {
        return ExitCode::FAILURE;
    }

    for board in [Board::Pico1, Board::Pico2] {
        let target = board.target();
        for wifi in [false, true] {
            let features = build_features(board, wifi);
            println!(
                "\n{}",
                format!("==> Building library ({features})...").cyan()
            );
            if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
                "build",
                "--lib",
                "--target",
                target,
                "--features",
                &features,
                "--no-default-features",
            ])) {
                return ExitCode::FAILURE;
            }
        }

        println!(
            "\n{}",
            format!("==> Building firmware ({board})...").cyan()
        );
        if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
            "build",
            "--bin",
            FIRMWARE,
            "--target",
            target,
            "--features",
            &build_features(board, true),
            "--no-default-features",
        ])) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "doc",
        "--target",
        Board::Pico2.target(),
        "--no-deps",
        "--features",
        &build_features(Board::Pico2, true),
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed! 🎉".green().bold());
    ExitCode::SUCCESS
}

fn run_host_tests() -> bool {
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut test_cmd = Command::new("cargo");
    test_cmd
        .current_dir(workspace_root())
        .args(["test", "--package", "net-alarm-clock"]);

    if let Some(target) = host_target {
        test_cmd.arg("--target").arg(target);
    }

    run_command(&mut test_cmd)
}

fn build_lib(board: Board, wifi: bool) -> ExitCode {
    let workspace_root = workspace_root();
    let target = board.target();
    let features = build_features(board, wifi);
    println!(
        "{}",
        format!("Building library with features: {features}").cyan()
    );

    if run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--lib",
        "--target",
        target,
        "--features",
        &features,
        "--no-default-features",
    ])) {
        println!("{}", "Build successful! ✨".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_uf2(board: Board) -> ExitCode {
    let workspace_root = workspace_root();
    let target = board.target();
    let features = build_features(board, true);

    println!(
        "{}",
        format!("Building UF2 for '{FIRMWARE}' ({board})").cyan()
    );
    println!("  Features: {}", features.bright_black());
    println!("  Target: {}", target.bright_black());

    // Build in release mode for UF2
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--bin",
        FIRMWARE,
        "--release",
        "--target",
        target,
        "--features",
        &features,
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    // Convert to UF2 using elf2uf2-rs
    let elf_path = format!("target/{target}/release/{FIRMWARE}");
    let uf2_path = format!("{FIRMWARE}-{board}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(&workspace_root)
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path} 🚀").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn build_features(board: Board, wifi: bool) -> String {
    let mut features = vec![board.to_string(), "arm".to_string()];
    if wifi {
        features.push("wifi".to_string());
    }
    features.join(",")
}

fn workspace_root() -> std::path::PathBuf {
    // `cargo xtask` runs from the workspace root.
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(host) = line.strip_prefix("host: ") {
            return Some(host.trim().to_string());
        }
    }
    None
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
