// Player state machine

/// Cardinal direction the player last moved or is currently attacking toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Down,
    Up,
    Left,
    Right,
}

impl Default for Facing {
    fn default() -> Self {
        Self::Down
    }
}

/// Player behavior state. Facing lives inside each variant, so every state
/// names the direction it poses toward and there is no separate flag to
/// fall out of sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerState {
    /// Standing or walking; the walk strip for `facing` is shown
    Idle { facing: Facing },
    /// Mid-attack; input is ignored and velocity is pinned to zero until
    /// the attack runs out
    Attacking { facing: Facing, elapsed: f32 },
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::Idle {
            facing: Facing::default(),
        }
    }
}

impl PlayerState {
    /// The direction this state poses toward
    pub fn facing(&self) -> Facing {
        match *self {
            Self::Idle { facing } => facing,
            Self::Attacking { facing, .. } => facing,
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self, Self::Attacking { .. })
    }

    /// Enter the attack state. An attack already in progress keeps its
    /// elapsed time; the attack cannot be restarted mid-swing.
    pub fn begin_attack(self) -> Self {
        match self {
            Self::Idle { facing } => Self::Attacking {
                facing,
                elapsed: 0.0,
            },
            attacking @ Self::Attacking { .. } => attacking,
        }
    }

    /// Turn toward a new facing. Ignored while attacking: the attack pose
    /// cannot be resteered.
    pub fn face(self, facing: Facing) -> Self {
        match self {
            Self::Idle { .. } => Self::Idle { facing },
            attacking @ Self::Attacking { .. } => attacking,
        }
    }

    /// Advance the attack timer. Returns the next state and whether the
    /// attack ended on this call.
    ///
    /// The timer accumulates while it is below `duration`; the state exits
    /// on the first advance that finds it already expired. An attack
    /// therefore holds its pose through the tick on which the timer fills.
    pub fn advance(self, dt: f32, duration: f32) -> (Self, bool) {
        match self {
            Self::Attacking { facing, elapsed } if elapsed < duration => (
                Self::Attacking {
                    facing,
                    elapsed: elapsed + dt,
                },
                false,
            ),
            Self::Attacking { facing, .. } => (Self::Idle { facing }, true),
            idle => (idle, false),
        }
    }
}
