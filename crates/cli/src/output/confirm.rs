use dialoguer::{theme::ColorfulTheme, Confirm};

/// Defaults to "no"; a closed or non-interactive stdin counts as "no".
pub fn confirm_action(msg: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(msg)
        .default(false)
        .interact()
        .unwrap_or(false)
}
