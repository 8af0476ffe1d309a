#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use colored::*;
    use portfolio_site::config::{ErrorStyle, FetchPolicy, SiteConfig};
    use portfolio_site::particles::{
        ManualScheduler, ParticleBackground, ParticleEnvironment, RecordingSurface,
    };
    use portfolio_site::repos::{RepoListView, RepoShowcase};
    use portfolio_site::Result;
    use tracing_subscriber::EnvFilter;

    #[tokio::main]
    pub async fn main() -> Result<()> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();

        let cli = Cli::parse();

        match cli.command {
            Command::Repos {
                username,
                api_base,
                timeout_secs,
                retries,
                generic_errors,
                output,
            } => {
                let config = SiteConfig {
                    github_username: username,
                    api_base_url: api_base,
                    error_style: if generic_errors {
                        ErrorStyle::Generic
                    } else {
                        ErrorStyle::Detailed
                    },
                    fetch: FetchPolicy {
                        timeout_ms: timeout_secs.map(|secs| secs * 1000),
                        retries,
                    },
                    ..SiteConfig::default()
                };
                config.validate()?;
                run_repos(&config, output).await
            }
            Command::Particles {
                width,
                height,
                frames,
                seed,
                primary_color,
            } => {
                run_particles(width, height, frames, seed, primary_color);
                Ok(())
            }
        }
    }

    async fn run_repos(config: &SiteConfig, output: Option<std::path::PathBuf>) -> Result<()> {
        eprintln!(
            "{} {}",
            "Fetching repositories for".bold(),
            config.github_username.green()
        );

        let showcase = RepoShowcase::from_config(config)?;
        let view = showcase.load().await;
        match &view {
            RepoListView::Cards(cards) => {
                eprintln!("✅ Rendered {} repository cards", cards.len());
            }
            RepoListView::Empty => eprintln!("{}", "No repositories to show".yellow()),
            RepoListView::Failed(err) => eprintln!("{} {}", "❌".red(), err.message().red()),
        }

        let html = view.to_html();
        match output {
            Some(path) => {
                std::fs::write(&path, html)?;
                eprintln!("Markup written to {}", path.display().to_string().dimmed());
            }
            None => println!("{}", html),
        }
        Ok(())
    }

    fn run_particles(
        width: f64,
        height: f64,
        frames: u32,
        seed: Option<u64>,
        primary_color: Option<String>,
    ) {
        let seed = seed.unwrap_or_else(|| {
            chrono::Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default()
                .unsigned_abs()
        });
        let env = ParticleEnvironment {
            width,
            height,
            prefers_reduced_motion: false,
            primary_color,
        };
        let options = SiteConfig::default().particles;
        let Some(mut background) =
            ParticleBackground::start(Some(RecordingSurface::new()), &env, &options, seed)
        else {
            eprintln!("{}", "Particle background did not start".yellow());
            return;
        };

        let mut scheduler = ManualScheduler::new();
        background.run_frames(&mut scheduler, frames);
        background.teardown(&mut scheduler);

        let surface = background.surface();
        let color = background.color();
        println!("{}", "Particle background".bold().green());
        println!("{}", "=".repeat(40).dimmed());
        println!("Canvas:      {}x{}", surface.size.0, surface.size.1);
        println!("Seed:        {}", seed);
        println!("Color:       rgb({}, {}, {})", color.r, color.g, color.b);
        println!("Particles:   {}", background.particle_count());
        println!("Frames:      {}", background.frames_rendered());
        println!("Connections: {} in the last frame", surface.lines().count());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> portfolio_site::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
