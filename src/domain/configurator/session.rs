//! One customer's editing session and the registry holding all of them.
//!
//! A session owns its catalog, configuration and navigator outright, so
//! concurrent sessions never share mutable state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use uuid::Uuid;

use super::configuration::{Configuration, ConfigurationError};
use super::drafts::Draft;
use super::pricing::{price_breakdown, total_price, PriceBreakdown};
use super::steps::{derive_steps, describe_steps, StepDescriptor, StepNavigator};
use super::variants::{compose_preview, Preview};
use crate::domain::aggregates::product::ProductSummary;
use crate::domain::catalog::NormalizedCatalog;
use crate::domain::value_objects::{MeasurementField, StepId, View};

#[derive(Clone, Debug)]
pub struct ConfiguratorSession {
    id: Uuid,
    product: ProductSummary,
    catalog: NormalizedCatalog,
    configuration: Configuration,
    navigator: StepNavigator,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serializable snapshot handed to the UI after every change
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
    pub id: Uuid,
    pub product: &'a ProductSummary,
    pub catalog: &'a NormalizedCatalog,
    pub steps: Vec<StepDescriptor>,
    pub active_step: &'a StepId,
    pub view: View,
    pub configuration: &'a Configuration,
    pub price: PriceBreakdown,
    pub preview: Preview,
    pub updated_at: DateTime<Utc>,
}

impl ConfiguratorSession {
    pub fn start(product: ProductSummary, catalog: NormalizedCatalog) -> Self {
        let configuration = Configuration::with_defaults(product.category, &catalog);
        let navigator = StepNavigator::new(derive_steps(&catalog, &configuration));
        let now = Utc::now();
        Self { id: Uuid::new_v4(), product, catalog, configuration, navigator, created_at: now, updated_at: now }
    }

    pub fn id(&self) -> Uuid { self.id }

    /// Last time the customer changed anything
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn product(&self) -> &ProductSummary { &self.product }
    pub fn catalog(&self) -> &NormalizedCatalog { &self.catalog }
    pub fn configuration(&self) -> &Configuration { &self.configuration }
    pub fn steps(&self) -> &[StepId] { self.navigator.steps() }
    pub fn active_step(&self) -> &StepId { self.navigator.active() }
    pub fn view(&self) -> View { self.navigator.view() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn total_price(&self) -> i64 { total_price(self.product.base_price, &self.configuration) }
    pub fn price_breakdown(&self) -> PriceBreakdown { price_breakdown(self.product.base_price, &self.configuration) }
    pub fn preview(&self) -> Preview { compose_preview(&self.configuration, self.navigator.steps(), self.navigator.view()) }

    pub fn select_fabric(&mut self, fabric_id: &str, color: Option<&str>) -> Result<(), ConfigurationError> {
        let fabric = self.catalog.fabric(fabric_id).cloned().ok_or_else(|| ConfigurationError::UnknownFabric(fabric_id.to_string()))?;
        self.configuration.set_fabric(fabric, color)?;
        self.changed();
        Ok(())
    }

    /// Choose an option for a style step; `None` is the explicit "none"
    pub fn select_option(&mut self, step: &str, option_id: Option<&str>) -> Result<(), ConfigurationError> {
        let group = self.catalog.group(step).ok_or_else(|| ConfigurationError::UnknownStep(step.into()))?;
        match option_id {
            Some(id) => {
                let option = group.option(id).cloned().ok_or_else(|| ConfigurationError::UnknownOption { step: step.into(), option_id: id.to_string() })?;
                self.configuration.select(group.step.clone(), option);
            }
            None => self.configuration.decline(group.step.clone())?,
        }
        self.changed();
        Ok(())
    }

    pub fn set_measurements<'a, I>(&mut self, values: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = (MeasurementField, &'a str)>,
    {
        self.configuration.set_measurements(values)?;
        self.touch();
        Ok(())
    }

    pub fn go_to(&mut self, step: &str) -> Result<(), ConfigurationError> {
        self.navigator.go_to(step)?;
        self.touch();
        Ok(())
    }

    pub fn next_step(&mut self) -> &StepId {
        self.touch();
        self.navigator.next()
    }

    pub fn previous_step(&mut self) -> &StepId {
        self.touch();
        self.navigator.previous()
    }

    pub fn set_view(&mut self, view: View) {
        self.navigator.set_view(view);
        self.touch();
    }

    /// Snapshot for the saved-drafts list
    pub fn draft(&self, id: Uuid) -> Draft {
        Draft {
            id,
            product_id: self.product.id,
            product_name: self.product.name.clone(),
            saved_at: Utc::now(),
            total_price: self.total_price(),
            configuration: self.configuration.clone(),
        }
    }

    pub fn view_model(&self) -> SessionView<'_> {
        SessionView {
            id: self.id,
            product: &self.product,
            catalog: &self.catalog,
            steps: describe_steps(&self.catalog, self.navigator.steps()),
            active_step: self.navigator.active(),
            view: self.navigator.view(),
            configuration: &self.configuration,
            price: self.price_breakdown(),
            preview: self.preview(),
            updated_at: self.updated_at,
        }
    }

    /// Selections can add or remove steps (a half sleeve hides the cuff)
    fn changed(&mut self) {
        let steps = derive_steps(&self.catalog, &self.configuration);
        if self.navigator.refresh(steps) {
            debug!(session_id = %self.id, active = %self.navigator.active(), "active step reset after step list changed");
        }
        self.touch();
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

/// All live sessions, keyed by id
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, ConfiguratorSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self { Self::default() }

    pub async fn insert(&self, session: ConfiguratorSession) -> Uuid {
        let id = session.id();
        self.sessions.write().await.insert(id, session);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<ConfiguratorSession> { self.sessions.read().await.get(&id).cloned() }

    /// Run `f` against a session under the write lock
    pub async fn update<T, E>(&self, id: Uuid, f: impl FnOnce(&mut ConfiguratorSession) -> Result<T, E>) -> Option<Result<T, E>> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(f)
    }

    pub async fn remove(&self, id: Uuid) -> Option<ConfiguratorSession> { self.sessions.write().await.remove(&id) }

    /// Drop every session untouched since `cutoff`; returns how many went
    pub async fn prune_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.updated_at >= cutoff);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, remaining = sessions.len(), "idle sessions pruned");
        }
        pruned
    }

    /// Background task pruning sessions idle for longer than `max_idle`
    pub fn spawn_idle_sweep(&self, max_idle: chrono::Duration, every: std::time::Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.prune_idle(Utc::now() - max_idle).await;
            }
        })
    }

    pub async fn len(&self) -> usize { self.sessions.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.sessions.read().await.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogShape, FabricOption, LegacyCatalog, OptionGroup, StyleOption};
    use crate::domain::value_objects::ProductCategory;

    fn shirt() -> ConfiguratorSession {
        let mut fabric = FabricOption::new("f1", "Oxford");
        fabric.price_modifier = Some(800);
        let catalog = NormalizedCatalog::from_shape(CatalogShape::Flat(LegacyCatalog {
            fabrics: vec![fabric],
            sleeves: vec![StyleOption::new("full", "Full Sleeve"), StyleOption::new("half", "Half Sleeve")],
            cuffs: vec![StyleOption::new("k1", "Barrel").with_price(-100)],
            collars: vec![StyleOption::new("c1", "Spread").with_price(300)],
            neckties: vec![StyleOption::new("t1", "Tie")],
            bowties: vec![StyleOption::new("b1", "Bow")],
            ..Default::default()
        }));
        let product = ProductSummary { id: None, name: "Shirt".into(), category: ProductCategory::Shirt, base_price: 5000 };
        ConfiguratorSession::start(product, catalog)
    }

    #[test]
    fn test_start_prices_defaults() {
        let s = shirt();
        assert_eq!(s.active_step().as_str(), "fabric");
        assert_eq!(s.total_price(), 6000);
        // both tie defaults apply in order, the later bowtie wins
        assert!(s.configuration().selection("necktie").is_none());
        assert!(s.configuration().chosen("bowtie").is_some());
    }

    #[test]
    fn test_half_sleeve_moves_active_step_off_cuff() {
        let mut s = shirt();
        s.go_to("cuff").unwrap();
        s.select_option("sleeve", Some("half")).unwrap();
        assert!(!s.steps().iter().any(|st| *st == "cuff"));
        assert_eq!(s.active_step().as_str(), "fabric");
    }

    #[test]
    fn test_unknown_choices_rejected() {
        let mut s = shirt();
        assert!(matches!(s.select_option("collar", Some("nope")), Err(ConfigurationError::UnknownOption { .. })));
        assert!(matches!(s.select_option("lining", Some("x")), Err(ConfigurationError::UnknownStep(_))));
        assert!(matches!(s.select_fabric("f9", None), Err(ConfigurationError::UnknownFabric(_))));
        assert!(matches!(s.select_option("collar", None), Err(ConfigurationError::NotOptional(_))));
    }

    #[test]
    fn test_decline_optional_step() {
        let mut s = shirt();
        s.select_option("bowtie", None).unwrap();
        assert_eq!(s.total_price(), 6000);
        assert!(s.configuration().chosen("bowtie").is_none());
    }

    #[test]
    fn test_grouped_session() {
        let catalog = NormalizedCatalog::from_shape(CatalogShape::Grouped {
            fabrics: vec![],
            groups: vec![OptionGroup { id: "g1".into(), label: "Lining".into(), category: "lining".into(), order: 0,
                options: vec![StyleOption::new("l1", "Silk").with_price(1200)] }],
        });
        let product = ProductSummary { id: None, name: "Suit".into(), category: ProductCategory::Suit, base_price: 30000 };
        let mut s = ConfiguratorSession::start(product, catalog);
        assert_eq!(s.total_price(), 31200);
        assert_eq!(s.next_step().as_str(), "lining");
        let view = s.view_model();
        assert_eq!(view.steps[1].label, "Lining");
    }

    #[tokio::test]
    async fn test_registry_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let a = registry.insert(shirt()).await;
        let b = registry.insert(shirt()).await;
        registry.update(a, |s| s.select_option("sleeve", Some("half"))).await.unwrap().unwrap();
        let a = registry.get(a).await.unwrap();
        let b = registry.get(b).await.unwrap();
        assert_eq!(a.configuration().chosen("sleeve").unwrap().id, "half");
        assert_eq!(b.configuration().chosen("sleeve").unwrap().id, "full");
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_prune_idle_sessions() {
        let registry = SessionRegistry::new();
        let id = registry.insert(shirt()).await;
        let touched = registry.get(id).await.unwrap().updated_at();

        assert_eq!(registry.prune_idle(touched - chrono::Duration::hours(1)).await, 0);
        assert!(registry.get(id).await.is_some());

        assert_eq!(registry.prune_idle(touched + chrono::Duration::seconds(1)).await, 1);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_idle_sweep_runs_on_interval() {
        let registry = SessionRegistry::new();
        registry.insert(shirt()).await;
        let sweep = registry.spawn_idle_sweep(chrono::Duration::zero(), std::time::Duration::from_millis(10));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(registry.is_empty().await);
        sweep.abort();
    }
}
