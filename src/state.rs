use std::sync::Arc;

use crate::{
    config::Config,
    identity::{HttpIdentityProvider, IdentityProvider},
    inventory::InventoryTracker,
    recipes::{CompletionClient, RecipeSuggester},
    store::{DocumentStore, RedisStore, init_redis},
};

pub struct State {
    pub config: Config,
    pub tracker: InventoryTracker,
    pub suggester: Option<Arc<dyn RecipeSuggester>>,
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let connection = init_redis(&config.redis_url).await;
        let store = Arc::new(RedisStore::new(connection));

        let suggester = config.completions_key.clone().map(|key| {
            Arc::new(CompletionClient::new(
                config.completions_url.clone(),
                config.completions_model.clone(),
                key,
                config.completions_max_tokens,
            )) as Arc<dyn RecipeSuggester>
        });

        let identity = config
            .identity_url
            .clone()
            .map(|url| Arc::new(HttpIdentityProvider::new(url)) as Arc<dyn IdentityProvider>);

        Self::with_store(config, store, suggester, identity).await
    }

    /// Wire the state around an arbitrary store and collaborators. Tests use
    /// this with a `MemoryStore` and mock suggesters.
    pub async fn with_store(
        config: Config,
        store: Arc<dyn DocumentStore>,
        suggester: Option<Arc<dyn RecipeSuggester>>,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Arc<Self> {
        let tracker = InventoryTracker::new(store);
        tracker.refresh().await;

        Arc::new(Self {
            config,
            tracker,
            suggester,
            identity,
        })
    }
}
