//! Traits describing read-only content and injected randomness.
//!
//! Oracles expose the static content tables and the seeded random source. The
//! [`Env`] aggregate bundles them so the battle and tower engines can access
//! everything they need without hard coupling to concrete implementations.
mod content;
mod error;
mod rng;
mod snapshot;

pub use content::ContentOracle;
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed, roll};
pub use snapshot::ContentSnapshot;

/// Aggregates the read-only oracles required by the engines.
pub struct Env<'a, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    content: Option<&'a C>,
    rng: Option<&'a R>,
}

impl<C, R> Clone for Env<'_, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, R> Copy for Env<'_, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn ContentOracle + 'a, dyn RngOracle + 'a>;

impl<'a, C, R> Env<'a, C, R>
where
    C: ContentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(content: Option<&'a C>, rng: Option<&'a R>) -> Self {
        Self { content, rng }
    }

    pub fn with_all(content: &'a C, rng: &'a R) -> Self {
        Self::new(Some(content), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            content: None,
            rng: None,
        }
    }

    /// Returns the ContentOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ContentNotAvailable` if no content oracle was provided.
    pub fn content(&self) -> Result<&'a C, OracleError> {
        self.content.ok_or(OracleError::ContentNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, C, R> Env<'a, C, R>
where
    C: ContentOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let content: Option<&'a dyn ContentOracle> = self.content.map(|content| content as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(content, rng)
    }
}
