use crate::config::{ErrorStyle, SiteConfig};
use crate::dom::RenderTarget;
use crate::error::{PortfolioError, Result};
use crate::github::GitHubClient;
use crate::types::GitHubRepo;
use tracing::{debug, error, info};

pub const UNKNOWN_LANGUAGE_COLOR: &str = "#888888";
pub const GENERIC_ERROR_MESSAGE: &str = "Unable to load repositories. Please try again later.";
pub const RATE_LIMIT_MESSAGE: &str = "GitHub API rate limit exceeded. Please check back in an hour.";
pub const EMPTY_MESSAGE: &str = "No repositories found.";

// GitHub's linguist colours
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Ruby", "#701516"),
    ("PHP", "#4F5D95"),
    ("C", "#555555"),
    ("C++", "#f34b7d"),
    ("C#", "#178600"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Shell", "#89e051"),
    ("Dart", "#00B4AB"),
    ("Vue", "#41b883"),
    ("React", "#61dafb"),
];

/// Dot colour for a language name; exact, case-sensitive match.
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_LANGUAGE_COLOR)
}

/// Somewhere repository summaries come from.
#[allow(async_fn_in_trait)]
pub trait RepoSource {
    async fn fetch_repos(&self, username: &str) -> Result<Vec<GitHubRepo>>;
}

impl RepoSource for GitHubClient {
    async fn fetch_repos(&self, username: &str) -> Result<Vec<GitHubRepo>> {
        self.fetch_user_repos(username).await
    }
}

/// Keep non-forks and starred forks, in API order, at most `max`.
pub fn select_repos(repos: Vec<GitHubRepo>, max: usize) -> Vec<GitHubRepo> {
    repos
        .into_iter()
        .filter(|repo| !repo.fork || repo.stargazers_count > 0)
        .take(max)
        .collect()
}

/// One rendered repository card.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoCard {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    /// Language name and its dot colour.
    pub language: Option<(String, &'static str)>,
    /// Star count, only when non-zero.
    pub stars: Option<u32>,
}

impl From<GitHubRepo> for RepoCard {
    fn from(repo: GitHubRepo) -> Self {
        let language = repo.language.filter(|l| !l.is_empty()).map(|name| {
            let color = language_color(&name);
            (name, color)
        });
        Self {
            name: repo.name,
            url: repo.html_url,
            description: repo.description.filter(|d| !d.is_empty()),
            language,
            stars: (repo.stargazers_count > 0).then_some(repo.stargazers_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoLoadError {
    RateLimited,
    Unavailable,
}

impl RepoLoadError {
    pub fn classify(err: &PortfolioError, style: ErrorStyle) -> Self {
        match style {
            ErrorStyle::Detailed if err.is_rate_limit() => RepoLoadError::RateLimited,
            _ => RepoLoadError::Unavailable,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RepoLoadError::RateLimited => RATE_LIMIT_MESSAGE,
            RepoLoadError::Unavailable => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// What the repository list shows after a load.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoListView {
    Cards(Vec<RepoCard>),
    Empty,
    Failed(RepoLoadError),
}

impl RepoListView {
    pub fn from_result(result: Result<Vec<GitHubRepo>>, max_cards: usize, style: ErrorStyle) -> Self {
        match result {
            Ok(repos) => {
                let selected = select_repos(repos, max_cards);
                if selected.is_empty() {
                    RepoListView::Empty
                } else {
                    RepoListView::Cards(selected.into_iter().map(RepoCard::from).collect())
                }
            }
            Err(err) => RepoListView::Failed(RepoLoadError::classify(&err, style)),
        }
    }

    pub fn card_count(&self) -> usize {
        match self {
            RepoListView::Cards(cards) => cards.len(),
            _ => 0,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            RepoListView::Cards(cards) => cards.iter().map(render_card).collect(),
            RepoListView::Empty => format!(r#"<div class="loading">{EMPTY_MESSAGE}</div>"#),
            RepoListView::Failed(err) => format!(
                r#"<div class="loading error"><i data-lucide="alert-circle"></i><p>{}</p></div>"#,
                err.message()
            ),
        }
    }
}

fn render_card(card: &RepoCard) -> String {
    let mut html = format!(
        r#"<a href="{}" class="repo-card" target="_blank" rel="noopener noreferrer">"#,
        escape_html(&card.url)
    );
    html.push_str(&format!(
        r#"<div class="repo-name">{}</div>"#,
        escape_html(&card.name)
    ));
    if let Some(description) = &card.description {
        html.push_str(&format!(
            r#"<div class="repo-description">{}</div>"#,
            escape_html(description)
        ));
    }
    html.push_str(r#"<div class="repo-meta">"#);
    if let Some((language, color)) = &card.language {
        html.push_str(&format!(
            r#"<div class="repo-language"><span class="language-dot" style="background-color: {}"></span><span>{}</span></div>"#,
            color,
            escape_html(language)
        ));
    }
    if let Some(stars) = card.stars {
        html.push_str(&format!(
            r#"<div class="repo-stars"><i data-lucide="star" style="width: 1rem; height: 1rem;"></i><span>{stars}</span></div>"#
        ));
    }
    html.push_str("</div></a>");
    html
}

pub fn escape_html(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

/// Fetches one user's repositories and renders them as cards.
pub struct RepoShowcase<S> {
    source: S,
    username: String,
    max_cards: usize,
    error_style: ErrorStyle,
}

impl RepoShowcase<GitHubClient> {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let client = GitHubClient::from_config(config)?;
        Ok(Self::new(client, config))
    }
}

impl<S: RepoSource> RepoShowcase<S> {
    pub fn new(source: S, config: &SiteConfig) -> Self {
        Self {
            source,
            username: config.github_username.clone(),
            max_cards: config.max_cards,
            error_style: config.error_style,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One fetch, no retries beyond what the source itself does.
    pub async fn load(&self) -> RepoListView {
        let result = self.source.fetch_repos(&self.username).await;
        match &result {
            Ok(repos) => debug!(username = %self.username, fetched = repos.len(), "Repositories fetched"),
            Err(err) => error!(username = %self.username, error = %err, "Error fetching GitHub data"),
        }
        let view = RepoListView::from_result(result, self.max_cards, self.error_style);
        info!(cards = view.card_count(), "Repository list ready");
        view
    }

    /// Load and render into `target`. Without a target nothing is fetched.
    pub async fn render_into<T: RenderTarget>(&self, target: Option<T>) -> Option<RepoListView> {
        let mut target = target?;
        let view = self.load().await;
        target.set_inner_html(&view.to_html());
        Some(view)
    }
}
