//! Entry point for the studium-site command line.

/// Command line arguments
mod cli;

use std::io::Write;
use std::path::Path;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use futures::future::join_all;
use studium_site::Site;
use studium_site::config::{
    ConfigManager,
    SiteSettings,
};
use studium_site::document::Document;
use studium_site::localization::{
    self,
    ConfiguredSource,
    LocalizationLoader,
};
use studium_site::page::Page;
use studium_site::preference::{
    FilePreferenceStorage,
    LanguagePreference,
};
use studium_site::types::is_valid_language_code;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::{
    Cli,
    Command,
    LanguageAction,
};

/// Preference file used when no data directory is available
const LOCAL_PREFERENCE_FILE: &str = ".studium-preferences.json";

/// 引数を解釈してコマンドを実行する
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;

    let mut config_manager = ConfigManager::new();
    match &cli.config {
        Some(path) => config_manager.load_from_file(path)?,
        None => config_manager.load_settings(Some(cli.root.clone()))?,
    }
    let root = config_manager.site_root().cloned().unwrap_or_else(|| cli.root.clone());
    let settings = config_manager.get_settings();

    match cli.command {
        Command::Render { page, lang } => render(settings, &root, page.as_deref(), lang).await,
        Command::Language { action } => language(settings, &root, action),
        Command::Pages => pages(),
        Command::Build { out, lang } => build(settings, &root, &out, lang).await,
    }
}

/// ログ出力を初期化する
///
/// ファイル出力の場合、返り値のガードが破棄されるまで書き込みが続く。
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_file) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let directory = log_file.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_file.file_name().context("--log-file must name a file")?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();

    Ok(Some(guard))
}

/// 言語設定の保存先を決める
fn preference_storage(settings: &SiteSettings, root: &Path) -> FilePreferenceStorage {
    let path = settings
        .preference_file
        .as_ref()
        .map(|path| root.join(path))
        .or_else(FilePreferenceStorage::default_path)
        .unwrap_or_else(|| {
            tracing::warn!("No local data directory, using the site root for preferences");
            root.join(LOCAL_PREFERENCE_FILE)
        });
    FilePreferenceStorage::new(path)
}

/// 辞書の取得元を作成する
fn dictionary_source(settings: &SiteSettings, root: &Path) -> Result<ConfiguredSource> {
    ConfiguredSource::from_settings(&settings.languages_source, root)
        .context("Failed to set up the dictionary source")
}

/// `render`
async fn render(
    settings: &SiteSettings,
    root: &Path,
    page: Option<&str>,
    lang: Option<String>,
) -> Result<()> {
    let mut site =
        Site::new(settings, dictionary_source(settings, root)?, preference_storage(settings, root));
    site.startup().await;

    if let Some(lang) = lang {
        site.change_language(&lang).await?;
    }
    if let Some(page) = page
        && site.navigate_to(page).await.is_none()
    {
        tracing::warn!(page, "Unknown page");
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(site.to_html().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// `language get` / `language set`
fn language(settings: &SiteSettings, root: &Path, action: LanguageAction) -> Result<()> {
    let mut preference = LanguagePreference::new(
        preference_storage(settings, root),
        settings.default_language.as_str(),
    );

    match action {
        LanguageAction::Get => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", preference.get())?;
        }
        LanguageAction::Set { code } => {
            preference.set(&code)?;
            tracing::info!(
                language = %code,
                "Saved language preference to {:?}",
                preference.storage().path()
            );
        }
    }
    Ok(())
}

/// `pages`
fn pages() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for page in Page::ALL {
        writeln!(stdout, "{page}")?;
    }
    Ok(())
}

/// `build`
///
/// 辞書を並行して読み込み、言語 × ページごとに `{out}/{lang}/{page}.html` を書き出す。
async fn build(
    settings: &SiteSettings,
    root: &Path,
    out: &Path,
    languages: Vec<String>,
) -> Result<()> {
    let languages = if languages.is_empty() { settings.languages.clone() } else { languages };
    if let Some(invalid) = languages.iter().find(|code| !is_valid_language_code(code)) {
        anyhow::bail!("Invalid language code: {invalid:?}");
    }
    let loader = LocalizationLoader::new(dictionary_source(settings, root)?);

    let dictionaries = join_all(languages.iter().map(|language| loader.load(language))).await;

    let mut written = 0usize;
    for dictionary in &dictionaries {
        let directory = out.join(dictionary.language());
        tokio::fs::create_dir_all(&directory)
            .await
            .with_context(|| format!("Failed to create {}", directory.display()))?;

        for page in Page::ALL {
            let mut document = Document::new(settings.translation_attribute.as_str());
            document.mount_sidebar();
            document.render(page);
            localization::apply(&mut document, dictionary, settings.content_policy);

            let path = directory.join(format!("{}.html", page.id()));
            tokio::fs::write(&path, document.to_html(dictionary.language()))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written += 1;
        }
    }

    tracing::info!(languages = dictionaries.len(), files = written, "Built site into {:?}", out);
    Ok(())
}
