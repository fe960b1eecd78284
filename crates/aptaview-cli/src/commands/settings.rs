//! Local settings commands.

use anyhow::Result;
use clap::Subcommand;

use aptaview_core::settings::Theme;
use aptaview_infrastructure::AptaviewPaths;

use crate::context::AppContext;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings and where they are stored
    Show,
    /// Set the backend base URL; an empty value restores the default
    SetUrl { url: String },
    /// Set the theme preference: light, dark or auto
    SetTheme { theme: Theme },
    /// Restore every setting to its default and remove the file
    Reset,
}

pub async fn run(ctx: &AppContext, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = ctx.settings.settings().await?;
            println!("backend URL: {}", settings.backend_url);
            println!("theme:       {}", settings.theme);
            println!("file:        {}", AptaviewPaths::settings_file()?.display());
            Ok(())
        }
        SettingsAction::SetUrl { url } => {
            let settings = ctx.settings.set_backend_url(&url).await?;
            println!("backend URL: {}", settings.backend_url);
            Ok(())
        }
        SettingsAction::SetTheme { theme } => {
            let settings = ctx.settings.set_theme(theme).await?;
            println!("theme: {}", settings.theme);
            Ok(())
        }
        SettingsAction::Reset => {
            ctx.settings.reset().await?;
            println!("Settings restored to defaults");
            Ok(())
        }
    }
}
