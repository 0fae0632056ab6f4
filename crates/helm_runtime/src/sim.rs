//! In-process simulation stand-in
//!
//! Implements the external create/destroy contract for any kind by
//! handing out the lowest free id, the same allocation policy the real
//! simulation uses. The core never assumes that policy; it reflects
//! whatever id the API returns.

use helm_core::{EntitySpec, SimApi};

pub struct LocalSim {
    live: Vec<bool>,
}

impl LocalSim {
    pub fn new(capacity: usize) -> Self {
        Self {
            live: vec![false; capacity],
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|live| **live).count()
    }
}

impl<S: EntitySpec> SimApi<S> for LocalSim {
    fn create(&mut self, _args: &S::CreateArgs) -> Option<u32> {
        let index = self.live.iter().position(|live| !live)?;
        self.live[index] = true;
        Some(index as u32)
    }

    fn destroy(&mut self, id: u32) {
        if let Some(live) = self.live.get_mut(id as usize) {
            *live = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helm_core::kinds::player::PlayerSpec;

    #[test]
    fn hands_out_lowest_free_id() {
        let mut sim = LocalSim::new(2);
        let args = Default::default();
        assert_eq!(SimApi::<PlayerSpec>::create(&mut sim, &args), Some(0));
        assert_eq!(SimApi::<PlayerSpec>::create(&mut sim, &args), Some(1));
        assert_eq!(SimApi::<PlayerSpec>::create(&mut sim, &args), None);

        SimApi::<PlayerSpec>::destroy(&mut sim, 0);
        assert_eq!(SimApi::<PlayerSpec>::create(&mut sim, &args), Some(0));
    }
}
