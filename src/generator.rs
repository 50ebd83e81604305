#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::trace;

use crate::game::PIECE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Cube,
    L,
    MirroredL,
    Line,
    T,
    S,
    MirroredS,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Cube,
        ShapeKind::L,
        ShapeKind::MirroredL,
        ShapeKind::Line,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::MirroredS,
    ];

    #[must_use]
    pub fn from_roll(roll: u8) -> Self {
        Self::ALL[usize::from(roll) % Self::ALL.len()]
    }

    #[must_use]
    pub fn cells(self) -> &'static [(usize, usize); 4] {
        &SHAPE_TABLE[self as usize]
    }
}

// Rotation is anchored to the corners of the frame, so these offsets must not drift
static SHAPE_TABLE: [[(usize, usize); 4]; 7] = [
    [(1, 1), (2, 1), (1, 2), (2, 2)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(1, 2), (2, 0), (2, 1), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 1)],
    [(1, 1), (2, 1), (2, 2), (3, 2)],
    [(1, 2), (2, 2), (2, 1), (3, 1)],
];

// Each cycle moves the cell at index k+1 into index k
const ROTATION_CYCLES: [[(usize, usize); 4]; 4] = [
    [(0, 0), (3, 0), (3, 3), (0, 3)],
    [(1, 0), (3, 1), (2, 3), (0, 2)],
    [(2, 0), (3, 2), (1, 3), (0, 1)],
    [(1, 1), (2, 1), (2, 2), (1, 2)],
];

// A 4x4 piece frame indexed as `cells[x][y]`; `true` marks a piece cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PiecePattern {
    pub cells: [[bool; PIECE_SIZE]; PIECE_SIZE],
}

impl PiecePattern {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_shape(shape: ShapeKind) -> Self {
        let mut pattern = Self::empty();
        for &(x, y) in shape.cells() {
            pattern.cells[x][y] = true;
        }
        pattern
    }

    #[must_use]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.cells[x][y]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled().next().is_none()
    }

    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..PIECE_SIZE).flat_map(move |x| {
            (0..PIECE_SIZE).filter_map(move |y| self.cells[x][y].then_some((x, y)))
        })
    }

    // Corners, the two rings of edge cells and the inner 2x2 block each cycle
    // through four positions, so four turns give back the starting frame.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let mut next = *self;
        for cycle in &ROTATION_CYCLES {
            for k in 0..4 {
                let (to_x, to_y) = cycle[k];
                let (from_x, from_y) = cycle[(k + 1) % 4];
                next.cells[to_x][to_y] = self.cells[from_x][from_y];
            }
        }
        next
    }
}

// Source of the shape roll. Injected so games can be seeded or scripted.
pub trait RandomSource: Send + Sync {
    fn roll(&mut self, max: u8) -> u8;
}

impl RandomSource for fastrand::Rng {
    fn roll(&mut self, max: u8) -> u8 {
        self.u8(0..=max)
    }
}

#[derive(Resource)]
pub struct PieceGenerator {
    source: Box<dyn RandomSource>,
    incoming: PiecePattern,
    primed: bool,
}

impl PieceGenerator {
    #[must_use]
    pub fn new(source: Box<dyn RandomSource>) -> Self {
        Self {
            source,
            incoming: PiecePattern::empty(),
            primed: false,
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(fastrand::Rng::with_seed(seed)))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(Box::new(fastrand::Rng::new()))
    }

    #[must_use]
    pub fn incoming(&self) -> &PiecePattern {
        &self.incoming
    }

    // Not an iterator: the generator never runs dry
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> ShapeKind {
        let max = u8::try_from(ShapeKind::ALL.len() - 1).unwrap_or(u8::MAX);
        let shape = ShapeKind::from_roll(self.source.roll(max));
        self.incoming = PiecePattern::from_shape(shape);
        trace!("Queued {shape:?}");
        shape
    }

    // The first call of a game rolls an extra piece so the preview is never
    // empty once the first piece is visible.
    pub fn take(&mut self) -> PiecePattern {
        if !self.primed {
            self.next();
            self.primed = true;
        }
        let pattern = self.incoming;
        self.next();
        pattern
    }

    pub fn reset(&mut self) {
        self.incoming = PiecePattern::empty();
        self.primed = false;
    }
}
