//! The user context: live preferences and impact state shared by every
//! screen of the app.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use surplus_catalog::DietaryPreference;
use surplus_storage::KeyValueStore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::persistence::PersistenceQueue;
use crate::entities::{ImpactStats, UserPreferences};
use crate::repositories::{Aggregate, AggregateRepository};
use crate::types::{UserError, UserResult, UserSnapshot};

const AGGREGATE_COUNT: u8 = 2;

struct State {
    preferences: UserPreferences,
    impact: ImpactStats,
    pending_loads: u8,
}

impl State {
    fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }
}

struct Inner {
    state: RwLock<State>,
    loaded: watch::Sender<bool>,
    preferences_queue: PersistenceQueue,
    impact_queue: PersistenceQueue,
}

/// Cloneable handle to the user state.
///
/// Reads return copies of the current aggregates. Every action replaces the
/// aggregate it touches, queues a save of the whole aggregate and returns
/// the new value without waiting for the save.
#[derive(Clone)]
pub struct UserContext {
    inner: Arc<Inner>,
}

impl UserContext {
    /// Create the context and start loading both aggregates in the
    /// background. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (loaded, _) = watch::channel(false);
        let context = Self {
            inner: Arc::new(Inner {
                state: RwLock::new(State {
                    preferences: UserPreferences::default(),
                    impact: ImpactStats::default(),
                    pending_loads: AGGREGATE_COUNT,
                }),
                loaded,
                preferences_queue: PersistenceQueue::spawn(
                    Arc::clone(&store),
                    UserPreferences::KEY,
                ),
                impact_queue: PersistenceQueue::spawn(Arc::clone(&store), ImpactStats::KEY),
            }),
        };

        let repository = AggregateRepository::new(store);
        tokio::spawn(context.clone().hydrate_one(repository.clone(), |s| &mut s.preferences));
        tokio::spawn(context.clone().hydrate_one(repository, |s| &mut s.impact));
        context
    }

    /// Create the context and wait until both aggregates are loaded.
    pub async fn hydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let context = Self::spawn(store);
        context.ready().await;
        context
    }

    /// Resolves once hydration has finished.
    pub async fn ready(&self) {
        let mut receiver = self.inner.loaded.subscribe();
        let _ = receiver.wait_for(|loaded| *loaded).await;
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading()
    }

    pub fn preferences(&self) -> UserPreferences {
        self.read_state().preferences.clone()
    }

    pub fn impact(&self) -> ImpactStats {
        self.read_state().impact.clone()
    }

    pub fn snapshot(&self) -> UserSnapshot {
        let state = self.read_state();
        UserSnapshot {
            preferences: state.preferences.clone(),
            impact: state.impact.clone(),
            is_loading: state.is_loading(),
        }
    }

    pub fn toggle_dietary_preference(&self, tag: DietaryPreference) -> UserResult<UserPreferences> {
        self.update_preferences(|prefs| prefs.toggle_dietary_preference(tag))
    }

    pub fn toggle_favorite_restaurant(&self, restaurant_id: &str) -> UserResult<UserPreferences> {
        self.update_preferences(|prefs| prefs.toggle_favorite_restaurant(restaurant_id))
    }

    pub fn update_user_name(&self, name: impl Into<String>) -> UserResult<UserPreferences> {
        let name = name.into();
        self.update_preferences(|prefs| prefs.user_name = name)
    }

    /// Set or clear the profile photo reference.
    pub fn update_profile_photo(&self, uri: Option<String>) -> UserResult<UserPreferences> {
        self.update_preferences(|prefs| prefs.profile_photo_uri = uri)
    }

    pub fn update_user_email(&self, email: impl Into<String>) -> UserResult<UserPreferences> {
        let email = email.into();
        self.update_preferences(|prefs| prefs.user_email = Some(email))
    }

    pub fn update_user_address(&self, address: impl Into<String>) -> UserResult<UserPreferences> {
        let address = address.into();
        self.update_preferences(|prefs| prefs.user_address = Some(address))
    }

    pub fn record_meal_saved(&self, carbon_saved: f64, money_saved: f64) -> UserResult<ImpactStats> {
        self.update_impact(|stats| stats.record_meal_saved(carbon_saved, money_saved))
    }

    pub fn record_meal_donated(&self) -> UserResult<ImpactStats> {
        self.update_impact(ImpactStats::record_meal_donated)
    }

    /// Wait until every save issued before this call has settled.
    pub async fn flush(&self) {
        tokio::join!(
            self.inner.preferences_queue.flush(),
            self.inner.impact_queue.flush()
        );
    }

    /// Saves dropped because the store refused them.
    pub fn failed_saves(&self) -> u64 {
        self.inner.preferences_queue.failed_saves() + self.inner.impact_queue.failed_saves()
    }

    fn update_preferences(&self, f: impl FnOnce(&mut UserPreferences)) -> UserResult<UserPreferences> {
        self.mutate(&self.inner.preferences_queue, |s| &mut s.preferences, f)
    }

    fn update_impact(&self, f: impl FnOnce(&mut ImpactStats)) -> UserResult<ImpactStats> {
        self.mutate(&self.inner.impact_queue, |s| &mut s.impact, f)
    }

    fn mutate<T: Aggregate>(
        &self,
        queue: &PersistenceQueue,
        slot: fn(&mut State) -> &mut T,
        f: impl FnOnce(&mut T),
    ) -> UserResult<T> {
        let mut state = self.write_state();
        if state.is_loading() {
            return Err(UserError::StillLoading);
        }

        let aggregate = slot(&mut *state);
        f(aggregate);
        let updated = aggregate.clone();
        // Enqueue while holding the lock so saves follow mutation order.
        queue.enqueue(AggregateRepository::encode(&updated)?);
        Ok(updated)
    }

    async fn hydrate_one<T: Aggregate>(
        self,
        repository: AggregateRepository,
        slot: fn(&mut State) -> &mut T,
    ) {
        let loaded = match repository.load::<T>().await {
            Ok(Some(aggregate)) => {
                debug!(key = %T::KEY, "hydrated from storage");
                Some(aggregate)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %T::KEY, error = %e, "failed to load, using defaults");
                None
            }
        };

        let mut state = self.write_state();
        if let Some(aggregate) = loaded {
            *slot(&mut *state) = aggregate;
        }
        state.pending_loads = state.pending_loads.saturating_sub(1);
        if !state.is_loading() {
            info!("user state ready");
            self.inner.loaded.send_replace(true);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
