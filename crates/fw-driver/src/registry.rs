//! Driver profile registry.

use std::cell::OnceCell;

use fw_core::{DriverId, WeightedSampler};
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::{DriverError, DriverResult};
use crate::params::DriverParams;
use crate::profile::DriverProfile;

/// All driver profiles of a roadway, in registration order.
///
/// The selection sampler over profile weights is built on the first
/// [`DriverRegistry::select`] after any registration.
#[derive(Default)]
pub struct DriverRegistry {
    profiles:  Vec<DriverProfile>,
    by_name:   FxHashMap<String, DriverId>,
    selection: OnceCell<WeightedSampler<DriverId>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile.  Names must be unique.
    pub fn register(&mut self, params: &DriverParams) -> DriverResult<DriverId> {
        if self.by_name.contains_key(&params.name) {
            return Err(DriverError::Duplicate(params.name.clone()));
        }
        let id = DriverId::try_from(self.profiles.len()).map_err(|_| {
            DriverError::InvalidParams {
                name:   params.name.clone(),
                reason: "too many driver profiles".into(),
            }
        })?;

        let profile = DriverProfile::new(id, params)?;
        self.by_name.insert(params.name.clone(), id);
        self.profiles.push(profile);
        self.selection = OnceCell::new();
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: DriverId) -> Option<&DriverProfile> {
        self.profiles.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<DriverId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverProfile> {
        self.profiles.iter()
    }

    /// Pick a profile by weight (one uniform draw).
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> DriverResult<DriverId> {
        Ok(*self.selection()?.choose_fast(rng))
    }

    fn selection(&self) -> DriverResult<&WeightedSampler<DriverId>> {
        if let Some(sampler) = self.selection.get() {
            return Ok(sampler);
        }
        if self.profiles.is_empty() {
            return Err(DriverError::NoDrivers);
        }
        let weights = self.profiles.iter().map(|p| p.params().weight).collect();
        let ids = self.profiles.iter().map(|p| p.id).collect();
        let sampler = WeightedSampler::normalize(weights, ids)?;
        Ok(self.selection.get_or_init(|| sampler))
    }
}
