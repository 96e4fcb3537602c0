use crate::species::{builtin_profiles, SpeciesProfile, NORWAY_MAPLE};
use std::collections::HashMap;

/// Immutable lookup from species symbol to profile.
///
/// Both USDA symbols and lower-case common-name aliases resolve. Symbols
/// that are not registered fall back to the default profile.
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    profiles: Vec<SpeciesProfile>,
    index: HashMap<&'static str, usize>,
    default: SpeciesProfile,
}

impl SpeciesRegistry {
    /// Build the registry of built-in species, defaulting to the Norway maple.
    pub fn build() -> Self {
        Self::from_profiles(builtin_profiles(), NORWAY_MAPLE)
    }

    /// Build a registry from explicit profiles and a fallback profile.
    ///
    /// Later profiles win when symbols collide.
    pub fn from_profiles(profiles: Vec<SpeciesProfile>, default: SpeciesProfile) -> Self {
        let mut index = HashMap::with_capacity(profiles.len() * 2);
        for (i, profile) in profiles.iter().enumerate() {
            index.insert(profile.symbol, i);
            index.insert(profile.alias, i);
        }
        log::debug!(
            "[Foliage Debug] registry: {} species, default {}",
            profiles.len(),
            default.symbol
        );
        SpeciesRegistry {
            profiles,
            index,
            default,
        }
    }

    /// Profile for `symbol`, or the default profile when it is not registered.
    pub fn get(&self, symbol: &str) -> &SpeciesProfile {
        match self.lookup(symbol) {
            Some(profile) => profile,
            None => {
                log::debug!(
                    "[Foliage Debug] registry: unknown species '{}', using {}",
                    symbol,
                    self.default_profile().symbol
                );
                self.default_profile()
            }
        }
    }

    /// Profile for `symbol` without the fallback.
    pub fn lookup(&self, symbol: &str) -> Option<&SpeciesProfile> {
        self.index
            .get(symbol.trim())
            .map(|i| &self.profiles[*i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    pub fn default_profile(&self) -> &SpeciesProfile {
        &self.default
    }

    /// Registered profiles in registration order.
    pub fn profiles(&self) -> &[SpeciesProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for SpeciesRegistry {
    fn default() -> Self {
        Self::build()
    }
}
