use super::*;

pub trait MinefieldGenerator {
    fn generate(self, config: FieldConfig) -> MineLayout;
}

/// Uniform placement over every cell except the first revealed one. Its neighbours get no
/// special protection.
#[derive(Debug)]
pub struct RandomMinefieldGenerator<'a> {
    rng: &'a mut GameRng,
    start: CellIndex,
}

impl<'a> RandomMinefieldGenerator<'a> {
    pub fn new(rng: &'a mut GameRng, start: CellIndex) -> Self {
        Self { rng, start }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator<'_> {
    fn generate(self, config: FieldConfig) -> MineLayout {
        let mut mines: Board<bool> = Board::new(config.size);

        // reserve the start cell so it is never picked, released again at the end
        let start_reserved = mines.contains(self.start);
        if start_reserved {
            mines[self.start] = true;
        }
        let mut free_cells = mines.len() - usize::from(start_reserved);

        let requested = usize::from(config.mines);
        if requested > free_cells {
            log::warn!(
                "Minefield already full, requested {} but only fits {}",
                requested,
                free_cells
            );
        }

        for _ in 0..requested.min(free_cells) {
            let rank = self.rng.below(free_cells);
            let slot = mines
                .indexed()
                .filter(|&(_, &is_mine)| !is_mine)
                .map(|(index, _)| index)
                .nth(rank);
            if let Some(index) = slot {
                mines[index] = true;
                free_cells -= 1;
            }
        }

        if start_reserved {
            mines[self.start] = false;
        }
        MineLayout::from_mine_mask(mines)
    }
}
