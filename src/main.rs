//! popefinder - CLI entry point
//!
//! Runs the RAG example end to end: load the pope corpus into the vector
//! store if it is empty, then ask the backend for one pope as structured
//! output, then run the configured number of "next pope" follow-ups in
//! the same conversation session.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use popefinder::chat::{ChatModel, MistralChatClient, OllamaChatClient};
use popefinder::cli::Args;
use popefinder::config::Config;
use popefinder::ingest::{field_extractor, DocumentIngestor, JsonCorpus};
use popefinder::pipeline::ChatPipeline;
use popefinder::prompts::PromptTemplate;
use popefinder::retrieval::{FilterExpression, FilterOperator, SearchRequest};
use popefinder::store::{InMemoryVectorStore, QdrantVectorStore, VectorStore};
use popefinder::types::Pope;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const PONTIFF_NUMBER_KEY: &str = "pontiffNumber";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popefinder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    args.apply_to(&mut config);

    let ollama = OllamaChatClient::with_config(
        &config.backend.ollama_url,
        &config.backend.model,
        &config.backend.embed_model,
    )?;

    let backend: Arc<dyn ChatModel> = match config.backend.provider.as_str() {
        "mistral" => Arc::new(MistralChatClient::from_env()?),
        _ => {
            if !ollama.is_available().await {
                anyhow::bail!(
                    "Ollama is not reachable at {}. Start it with: ollama serve",
                    config.backend.ollama_url
                );
            }
            Arc::new(ollama.clone())
        }
    };

    let store: Arc<dyn VectorStore> = match config.store.kind.as_str() {
        "memory" => Arc::new(InMemoryVectorStore::new()),
        _ => Arc::new(
            QdrantVectorStore::connect(
                &config.qdrant.url,
                &config.qdrant.collection,
                config.qdrant.embedding_dim,
                Arc::new(ollama),
            )
            .await
            .context("Failed to connect to Qdrant")?,
        ),
    };

    let corpus = JsonCorpus::new(
        &config.resources.corpus,
        field_extractor(&[PONTIFF_NUMBER_KEY]),
    );
    let loaded = DocumentIngestor::ingest_if_empty(&corpus, store.as_ref())
        .await
        .context("Failed to load corpus into vector store")?;
    if loaded > 0 {
        info!(loaded, "Corpus loaded into vector store");
    }

    let searched = config.search.searched_pope_pontiff_number;
    let search_request = SearchRequest::builder()
        .filter(FilterExpression::new(
            PONTIFF_NUMBER_KEY,
            FilterOperator::Gte,
            searched,
        ))
        .top_k(config.search.top_k)
        .threshold(config.search.threshold)
        .build();

    let system_prompt =
        PromptTemplate::from_file(&config.resources.system_prompt)?.render_plain()?;
    let templated_user_prompt = PromptTemplate::from_file(&config.resources.templated_user_prompt)?;
    let user_prompt = PromptTemplate::from_file(&config.resources.user_prompt)?.render_plain()?;

    let pipeline = ChatPipeline::<Pope>::new(backend, store, search_request, system_prompt);
    let session_id = uuid::Uuid::new_v4().to_string();

    let variables = HashMap::from([
        ("searched_pope_pontiff_number", searched.to_string()),
        ("format", pipeline.format_instructions().to_string()),
    ]);
    let first_query = templated_user_prompt.render(&variables)?;

    let pope = pipeline.run(&first_query, &session_id).await?;
    print_pope(&format!("The pope with pontiff number {searched}"), &pope);

    for _ in 0..config.search.next_searched_popes_number {
        let pope = pipeline.run(&user_prompt, &session_id).await?;
        print_pope("The next pope", &pope);
    }

    Ok(())
}

fn print_pope(label: &str, pope: &Pope) {
    println!(
        "{} is {} ({}), {} of {}, elected {}.",
        label.cyan(),
        pope.english_name.green().bold(),
        pope.latin_name,
        pope.personal_name,
        pope.nationalities.join(", "),
        pope.pontiff_start_date,
    );
}
