//! Literature search and model-assisted curation.

use futures::future::FutureExt;
use serde_json::{json, Value};
use tracing::{info, warn};

use medroute_llm::ModelTier;
use medroute_sources::collect_named;
use medroute_types::{ArticleRecord, QueryBundle};

use crate::dedup::dedup_articles;
use crate::pipelines::truncate_chars;
use crate::prompt_defaults;
use crate::router::Services;

const DEFAULT_PUB_TYPES: [&str; 4] =
    ["systematic review", "meta-analysis", "clinical trial", "review"];
const SUMMARIZE_LIMIT: usize = 20;
const FALLBACK_ARTICLE_LIMIT: usize = 7;

/// Articles plus the model's Georgian overview of the field.
#[derive(Debug, Default)]
pub struct LiteratureResult {
    pub articles: Vec<ArticleRecord>,
    pub field_summary: String,
}

/// Search PubMed and Europe PMC in parallel, dedup by article id, and ask
/// the fast model to select and annotate the best ones. Any model failure
/// falls back to the raw articles.
pub async fn search_literature(
    services: &Services,
    bundle: &QueryBundle,
    original_query: &str,
    max_results: usize,
) -> LiteratureResult {
    let pub_types: Vec<String> = DEFAULT_PUB_TYPES.iter().map(|t| t.to_string()).collect();

    let articles = collect_named(vec![
        (
            "pubmed",
            services
                .pubmed
                .search(bundle.query_for("pubmed"), max_results, 3, &pub_types)
                .boxed(),
        ),
        (
            "europe-pmc",
            services.europe_pmc.search(&bundle.primary_term, 10).boxed(),
        ),
    ])
    .await;

    if articles.is_empty() {
        warn!("no articles from either literature source");
        return LiteratureResult::default();
    }

    let mut unique = dedup_articles(articles);
    unique.truncate(SUMMARIZE_LIMIT);
    summarize(services, unique, original_query).await
}

async fn summarize(
    services: &Services,
    articles: Vec<ArticleRecord>,
    query: &str,
) -> LiteratureResult {
    let system = services
        .prompts
        .load_or("literature_summarizer", prompt_defaults::LITERATURE_SUMMARIZER);

    let briefs: Vec<Value> = articles
        .iter()
        .map(|a| {
            json!({
                "article_id": a.article_id,
                "title": a.title,
                "abstract": truncate_chars(&a.abstract_summary, 500),
                "journal": a.journal,
                "year": a.year,
                "doi": a.doi,
            })
        })
        .collect();
    let user_message = format!(
        "Patient query: {query}\n\nArticles ({}):\n{}",
        briefs.len(),
        serde_json::to_string_pretty(&briefs).unwrap_or_default()
    );

    if let Some(reply) = services
        .generation
        .generate_json(ModelTier::Fast, &system, &user_message, 3000)
        .await
    {
        if let Some(curated) = reply
            .get("articles")
            .cloned()
            .and_then(|v| serde_json::from_value::<Vec<ArticleRecord>>(v).ok())
            .filter(|list| !list.is_empty())
        {
            info!(articles = curated.len(), "literature curated by model");
            return LiteratureResult {
                articles: curated,
                field_summary: reply
                    .get("field_summary")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            };
        }
    }

    // Raw articles, truncated abstracts, no Georgian annotations.
    warn!("literature curation failed, returning raw articles");
    let fallback: Vec<ArticleRecord> = articles
        .into_iter()
        .take(FALLBACK_ARTICLE_LIMIT)
        .map(|mut a| {
            a.abstract_summary = truncate_chars(&a.abstract_summary, 300);
            a
        })
        .collect();
    LiteratureResult {
        articles: fallback,
        field_summary: String::new(),
    }
}
