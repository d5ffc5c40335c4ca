use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "TOPUP_HOST",
        "TOPUP_PORT",
        "TOPUP_DATABASE_URL",
        "TOPUP_DIGIFLAZZ_URL",
        "TOPUP_NICKNAME_URL",
        "TOPUP_VENDOR_TIMEOUT",
        "TOPUP_RECONCILE_INTERVAL",
        "TOPUP_RECONCILE_BATCH",
        "TOPUP_DISABLE_RECONCILIATION",
        "TOPUP_BCRYPT_COST",
        "TOPUP_ADMIN_USERNAME",
        "TOPUP_JWT_EXPIRY",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
