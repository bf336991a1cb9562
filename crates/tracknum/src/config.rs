use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// First identifier of the default 4-digit space.
pub const DEFAULT_ID_FLOOR: u32 = 1000;

/// Last identifier of the default 4-digit space.
pub const DEFAULT_ID_CEILING: u32 = 9999;

/// Default collision-retry budget.
///
/// Generous for a 9000-slot space at low contention; deployments with a
/// fuller table should widen the range rather than raise the budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// How the allocator proposes candidate identifiers.
///
/// Neither strategy is safe on its own under concurrent writers; correctness
/// always comes from the store's uniqueness constraint plus the allocator's
/// duplicate-triggers-retry loop. The strategy only shapes what the number
/// space looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocStrategy {
    /// Draw a uniform random candidate in `[floor, ceiling]`, probe for an
    /// existing row, then insert. The probe keeps the loop cheap; the insert
    /// constraint is what makes it correct.
    RandomProbe { floor: u32, ceiling: u32 },

    /// Read the current maximum identifier and propose `max + 1` (`floor` on
    /// an empty table). Produces dense, guessable numbers.
    MonotonicNext { floor: u32 },
}

impl Default for AllocStrategy {
    fn default() -> Self {
        AllocStrategy::RandomProbe {
            floor: DEFAULT_ID_FLOOR,
            ceiling: DEFAULT_ID_CEILING,
        }
    }
}

/// Allocator tuning: candidate strategy and collision-retry budget.
///
/// # Example
///
/// ```
/// use tracknum::{AllocStrategy, AllocatorConfig};
///
/// let config = AllocatorConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(
///     config.strategy,
///     AllocStrategy::RandomProbe { floor: 1000, ceiling: 9999 }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    pub strategy: AllocStrategy,
    /// Attempts before the allocator gives up with `CollisionExhausted`.
    pub max_attempts: NonZeroU32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            strategy: AllocStrategy::default(),
            max_attempts: NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap(),
        }
    }
}

impl AllocatorConfig {
    /// Rejects an inverted random range.
    pub fn validate(&self) -> Result<(), Error> {
        match self.strategy {
            AllocStrategy::RandomProbe { floor, ceiling } if floor > ceiling => {
                Err(Error::InvalidConfig {
                    reason: format!("identifier range {floor}..={ceiling} is empty"),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Whether a status that has already left `in_progress` may be changed again.
///
/// Product intent here is unconfirmed, so the policy is explicit
/// configuration rather than a hard-coded behavior. `Guarded` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Refuse any transition once the status has left `in_progress`.
    #[default]
    Guarded,
    /// Allow repeated overwrites (last writer wins).
    Overwrite,
}
