//! Meal reservation: haptic confirmation, a short processing pause, then
//! the impact counters are updated.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use surplus_catalog::{Catalog, CatalogError, Meal};
use surplus_config::ReservationConfig;
use surplus_users::{ImpactStats, UserContext, UserError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::platform::Haptics;

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("A reservation is already in progress")]
    AlreadyReserving,

    #[error(transparent)]
    MealNotFound(#[from] CatalogError),

    #[error("Could not record the reservation: {0}")]
    User(#[from] UserError),

    #[error("Reservation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type ReservationResult<T> = Result<T, ReservationError>;

/// Choices made on the meal detail screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationOptions {
    /// Add the solidarity surcharge to pay for a donated meal.
    pub solidarity: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReservationState {
    Idle,
    Reserving { meal_id: String },
    Completed(ReservationReceipt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationReceipt {
    pub meal_id: String,
    /// Price paid, surcharge included.
    pub total_price: f64,
    pub donated: bool,
    /// Impact counters right after recording this reservation.
    pub impact: ImpactStats,
}

/// Runs reservations one at a time.
#[derive(Clone)]
pub struct ReservationFlow {
    users: UserContext,
    haptics: Arc<dyn Haptics>,
    processing_delay: Duration,
    solidarity_surcharge: f64,
    state: Arc<Mutex<ReservationState>>,
}

impl ReservationFlow {
    pub fn new(users: UserContext, haptics: Arc<dyn Haptics>, config: &ReservationConfig) -> Self {
        Self {
            users,
            haptics,
            processing_delay: Duration::from_millis(config.processing_delay_ms),
            solidarity_surcharge: config.solidarity_surcharge,
            state: Arc::new(Mutex::new(ReservationState::Idle)),
        }
    }

    pub fn state(&self) -> ReservationState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_reserving(&self) -> bool {
        matches!(self.state(), ReservationState::Reserving { .. })
    }

    /// Price shown before confirming.
    pub fn quote(&self, meal: &Meal, options: ReservationOptions) -> f64 {
        if options.solidarity {
            meal.discounted_price + self.solidarity_surcharge
        } else {
            meal.discounted_price
        }
    }

    /// Reserve `meal`.
    ///
    /// Fails with [`ReservationError::AlreadyReserving`] while another
    /// reservation is being processed. Once accepted, the reservation runs
    /// on its own task: dropping the returned future does not stop the
    /// impact from being recorded.
    pub async fn reserve(
        &self,
        meal: &Meal,
        options: ReservationOptions,
    ) -> ReservationResult<ReservationReceipt> {
        let guard = self.begin(&meal.id)?;
        if self.users.is_loading() {
            return Err(UserError::StillLoading.into());
        }

        let flow = self.clone();
        let meal = meal.clone();
        tokio::spawn(async move { flow.process(&meal, options, guard).await }).await?
    }

    /// Look `meal_id` up in `catalog` and reserve it.
    pub async fn reserve_by_id(
        &self,
        catalog: &Catalog,
        meal_id: &str,
        options: ReservationOptions,
    ) -> ReservationResult<ReservationReceipt> {
        let meal = catalog.find(meal_id)?;
        self.reserve(meal, options).await
    }

    /// Run [`reserve`](Self::reserve) without a caller waiting on it.
    pub fn reserve_detached(
        &self,
        meal: Meal,
        options: ReservationOptions,
    ) -> JoinHandle<ReservationResult<ReservationReceipt>> {
        let flow = self.clone();
        tokio::spawn(async move { flow.reserve(&meal, options).await })
    }

    async fn process(
        &self,
        meal: &Meal,
        options: ReservationOptions,
        guard: InFlight,
    ) -> ReservationResult<ReservationReceipt> {
        self.haptics.success();
        debug!(meal_id = %meal.id, delay_ms = self.processing_delay.as_millis() as u64, "processing reservation");
        tokio::time::sleep(self.processing_delay).await;

        self.users.record_meal_saved(meal.carbon_saved, meal.savings())?;
        let impact = if options.solidarity {
            self.users.record_meal_donated()?
        } else {
            self.users.impact()
        };

        let receipt = ReservationReceipt {
            meal_id: meal.id.clone(),
            total_price: self.quote(meal, options),
            donated: options.solidarity,
            impact,
        };
        info!(
            meal_id = %receipt.meal_id,
            total = receipt.total_price,
            donated = receipt.donated,
            "meal reserved"
        );
        guard.complete(receipt.clone());
        Ok(receipt)
    }

    fn begin(&self, meal_id: &str) -> ReservationResult<InFlight> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, ReservationState::Reserving { .. }) {
            return Err(ReservationError::AlreadyReserving);
        }
        *state = ReservationState::Reserving {
            meal_id: meal_id.to_string(),
        };
        Ok(InFlight {
            state: Arc::clone(&self.state),
            receipt: None,
        })
    }
}

/// Leaves `Reserving` when dropped: to `Completed` on success, otherwise
/// back to `Idle`.
struct InFlight {
    state: Arc<Mutex<ReservationState>>,
    receipt: Option<ReservationReceipt>,
}

impl InFlight {
    fn complete(mut self, receipt: ReservationReceipt) {
        self.receipt = Some(receipt);
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = match self.receipt.take() {
            Some(receipt) => ReservationState::Completed(receipt),
            None => ReservationState::Idle,
        };
    }
}
