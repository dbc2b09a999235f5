/// Lookup abstraction over the curated ingredient knowledge base, so the
/// normalization service can be exercised without a live store.
pub trait IngredientRepository: Send + Sync {
    /// Resolve a normalized name to a canonical ingredient identifier.
    ///
    /// A miss is `Ok(None)`; `Err` is reserved for infrastructure failure.
    fn find_canonical_by_name(&self, name: &str) -> Result<Option<String>, RepositoryError>;

    /// All known aliases for a canonical ingredient.
    fn aliases(&self, ingredient_id: &str) -> Result<Vec<String>, RepositoryError>;
}

/// Error enumeration for knowledge-base failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("ingredient store unavailable: {0}")]
    Unavailable(String),
}
