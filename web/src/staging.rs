use minefield_core::CellIndex;

/// Delay between flood batches.
pub(crate) const FLOOD_STEP_MS: u32 = 10;
pub(crate) const FLOOD_BATCH: usize = 8;
/// Delay between disclosed mines after a loss.
pub(crate) const DISCLOSURE_STEP_MS: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StagedBatch {
    pub delay_ms: u32,
    pub indexes: Vec<CellIndex>,
}

/// Cells the engine already revealed but the view still draws as closed, for pacing only.
/// Releases from an earlier game carry a stale generation and are dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RevealStaging {
    generation: u32,
    held: Vec<bool>,
    held_count: usize,
}

impl RevealStaging {
    pub(crate) fn new(generation: u32) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn is_held(&self, index: CellIndex) -> bool {
        self.held.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.held_count > 0
    }

    pub(crate) fn hold(&mut self, batches: &[StagedBatch]) {
        for &index in batches.iter().flat_map(|batch| &batch.indexes) {
            if index >= self.held.len() {
                self.held.resize(index + 1, false);
            }
            if !self.held[index] {
                self.held[index] = true;
                self.held_count += 1;
            }
        }
    }

    pub(crate) fn release(&mut self, generation: u32, indexes: &[CellIndex]) -> bool {
        if generation != self.generation {
            log::trace!(
                "dropping {} staged cells from game {}, current is {}",
                indexes.len(),
                generation,
                self.generation
            );
            return false;
        }

        let mut changed = false;
        for &index in indexes {
            if let Some(held) = self.held.get_mut(index) {
                if *held {
                    *held = false;
                    self.held_count -= 1;
                    changed = true;
                }
            }
        }
        changed
    }
}

/// The clicked cell shows at once, the rest of the flood follows in small batches.
pub(crate) fn plan_flood(opened: &[CellIndex]) -> Vec<StagedBatch> {
    opened
        .get(1..)
        .unwrap_or_default()
        .chunks(FLOOD_BATCH)
        .zip(1u32..)
        .map(|(chunk, step)| StagedBatch {
            delay_ms: FLOOD_STEP_MS * step,
            indexes: chunk.to_vec(),
        })
        .collect()
}

/// Remaining mines appear one at a time.
pub(crate) fn plan_disclosure(mines: &[CellIndex]) -> Vec<StagedBatch> {
    mines
        .iter()
        .zip(1u32..)
        .map(|(&index, step)| StagedBatch {
            delay_ms: DISCLOSURE_STEP_MS * step,
            indexes: vec![index],
        })
        .collect()
}
