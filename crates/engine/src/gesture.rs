use match3_core::{GameState, RandomSource, RequestError};
use match3_types::{Cell, GameEvent, SpecialKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset; `Up` is toward larger `y`.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Drag a piece one cell in `direction`.
    Swipe { cell: Cell, direction: Direction },
    DoubleTap { cell: Cell },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    Rejected(RequestError),
    OffBoard,
    NothingToActivate,
}

impl GestureError {
    pub fn code(self) -> &'static str {
        match self {
            GestureError::Rejected(e) => e.code(),
            GestureError::OffBoard => "invalid_cell",
            GestureError::NothingToActivate => "invalid_activation",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GestureError::Rejected(e) => e.message(),
            GestureError::OffBoard => "swipe target is outside the board",
            GestureError::NothingToActivate => "double tap on a plain piece",
        }
    }
}

impl From<RequestError> for GestureError {
    fn from(e: RequestError) -> Self {
        GestureError::Rejected(e)
    }
}

/// Stage the action a gesture stands for. Resolution is left to the caller.
///
/// A double tap on a cart activates it with a random target color, on a bomb
/// it detonates the bomb. Plain pieces have nothing to activate.
pub fn apply_gesture<R: RandomSource + Clone>(
    state: &mut GameState<R>,
    gesture: Gesture,
) -> Result<(), GestureError> {
    match gesture {
        Gesture::Swipe { cell, direction } => {
            let (dx, dy) = direction.delta();
            let target = cell.offset(dx, dy);
            if !state.board().contains(target) {
                // Gate errors win over geometry so a busy game reports busy.
                if !state.is_playable() {
                    return Err(GestureError::Rejected(if state.game_over() || !state.started() {
                        RequestError::NotPlayable
                    } else {
                        RequestError::Busy
                    }));
                }
                return Err(GestureError::OffBoard);
            }
            state.request_swap(cell, target)?;
        }
        Gesture::DoubleTap { cell } => {
            let special = state.board().contains(cell).then(|| state.board().at(cell)).flatten();
            match special.map(|p| p.special) {
                Some(SpecialKind::Cart) => state.request_activate_cart(cell, None)?,
                Some(SpecialKind::Bomb(_)) => state.request_activate_special(cell)?,
                Some(SpecialKind::None) if state.is_playable() => {
                    return Err(GestureError::NothingToActivate)
                }
                // Let the gate report holes, empties, bounds and busy.
                _ => state.request_activate_special(cell)?,
            }
        }
    }
    Ok(())
}

/// Apply a gesture and run the resulting action to completion.
pub fn play_gesture<R: RandomSource + Clone>(
    state: &mut GameState<R>,
    gesture: Gesture,
) -> Result<Vec<GameEvent>, GestureError> {
    apply_gesture(state, gesture)?;
    Ok(state.resolve())
}
