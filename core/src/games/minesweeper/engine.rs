use alloc::collections::{BTreeSet, VecDeque};
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use super::*;

/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    Revealed(u8),
    Flagged,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No mines placed yet.
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

/// Minesweeper rules over a field whose mines are laid on the first reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEngine {
    config: FieldConfig,
    mine_layout: Option<MineLayout>,
    board: Board<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    triggered_mine: Option<CellIndex>,
}

impl PlayEngine {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            mine_layout: None,
            board: Board::new(config.size),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: EngineState::Ready,
            triggered_mine: None,
        }
    }

    /// Engine over a fixed layout, skipping the lazy placement.
    pub fn with_layout(mine_layout: MineLayout) -> Self {
        let mut engine = Self::new(mine_layout.field_config());
        engine.mine_layout = Some(mine_layout);
        engine.state = EngineState::Active;
        engine
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn layout(&self) -> Option<&MineLayout> {
        self.mine_layout.as_ref()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn flags_left(&self) -> CellCount {
        self.config.mines.saturating_sub(self.flagged_count.0)
    }

    pub fn cell(&self, index: CellIndex) -> Option<EngineCell> {
        self.board.get(index).copied()
    }

    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    pub fn status(&self) -> Status {
        match self.state {
            EngineState::Won => Status::Win(Player::Human),
            EngineState::Lost => Status::Loss,
            EngineState::Ready | EngineState::Active => Status::Ongoing,
        }
    }

    /// Flags or unflags a hidden cell. There are never more flags than mines.
    pub fn toggle_flag(&mut self, index: CellIndex) -> MarkOutcome {
        use EngineCell::*;
        use MarkOutcome::*;

        if self.state.is_finished() {
            return NoChange;
        }

        match self.cell(index) {
            Some(Hidden) if self.flags_left() > 0 => {
                self.board[index] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Some(Flagged) => {
                self.board[index] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            _ => NoChange,
        }
    }

    /// Opens a hidden cell. The first reveal lays the mines, never under the revealed cell.
    pub fn reveal(&mut self, index: CellIndex, rng: &mut GameRng) -> RevealOutcome {
        if self.state.is_finished() || self.cell(index) != Some(EngineCell::Hidden) {
            return RevealOutcome::NoChange;
        }

        let mine_layout = match self.mine_layout.take() {
            Some(mine_layout) => mine_layout,
            None => {
                let mine_layout = RandomMinefieldGenerator::new(rng, index).generate(self.config);
                log::debug!("minesweeper: laid {} mines", mine_layout.mine_count());
                self.state = EngineState::Active;
                mine_layout
            }
        };
        let outcome = self.reveal_single_cell(&mine_layout, index);
        self.mine_layout = Some(mine_layout);
        outcome
    }

    fn reveal_single_cell(&mut self, mine_layout: &MineLayout, index: CellIndex) -> RevealOutcome {
        if mine_layout.contains_mine(index) {
            self.triggered_mine = Some(index);
            self.state = EngineState::Lost;
            return RevealOutcome::HitMine;
        }

        let mut visited = BTreeSet::from([index]);
        let mut to_visit = VecDeque::from([index]);
        while let Some(visit) = to_visit.pop_front() {
            let adjacent_mines = mine_layout.adjacent_mine_count(visit);
            self.board[visit] = EngineCell::Revealed(adjacent_mines);
            self.revealed_count += 1;

            if adjacent_mines == 0 {
                let next: VecDeque<_> = mine_layout
                    .iter_neighbors(visit)
                    .filter(|&pos| matches!(self.board[pos], EngineCell::Hidden))
                    .filter(|&pos| visited.insert(pos))
                    .collect();
                to_visit.extend(next);
            }
        }
        log::trace!(
            "minesweeper: opened {} of {}",
            self.revealed_count,
            mine_layout.safe_cell_count()
        );

        if self.revealed_count == Saturating(mine_layout.safe_cell_count()) {
            self.state = EngineState::Won;
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }
}
