/// Configuration for a [`crate::PreKeyManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreKeyManagerConfig {
    /// One-time prekeys minted by [`crate::PreKeyManager::generate_batch`].
    pub batch_size: u32,
}

impl Default for PreKeyManagerConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_batch_is_one_hundred() {
        assert_eq!(PreKeyManagerConfig::default().batch_size, 100);
    }
}
