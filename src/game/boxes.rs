use std::fmt::{self, Debug};

use owo_colors::{OwoColorize, Style};

use crate::search::{Evaluator, GameState, Move};

/// Draws the line `edge` for `player`.
///
/// Horizontal edges come first, row by row from the top, followed by the
/// vertical edges, again row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line {
    pub player: usize,
    pub edge: usize,
}

impl Move for Line {
    fn player(&self) -> usize {
        self.player
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Claim {
    line: Line,
    boxes: [Option<usize>; 2],
}

/// Dots and boxes for two players.
///
/// Whoever closes a box owns it and draws another line.
#[derive(Clone, PartialEq, Eq)]
pub struct Boxes {
    width: usize,
    height: usize,
    drawn: Vec<bool>,
    owners: Vec<Option<u8>>,
    score: [usize; 2],
    turn: usize,
    history: Vec<Claim>,
}

impl Boxes {
    /// Empty board of `width` x `height` boxes.
    pub fn new(width: usize, height: usize) -> Boxes {
        assert!(width > 0 && height > 0, "empty board");
        let edges = width * (height + 1) + (width + 1) * height;
        Boxes {
            width,
            height,
            drawn: vec![false; edges],
            owners: vec![None; width * height],
            score: [0; 2],
            turn: 0,
            history: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn edge_count(&self) -> usize {
        self.drawn.len()
    }

    /// Boxes owned by `player`.
    pub fn score(&self, player: usize) -> usize {
        self.score[player]
    }

    pub fn owner(&self, x: usize, y: usize) -> Option<usize> {
        self.owners[y * self.width + x].map(usize::from)
    }

    pub fn is_drawn(&self, edge: usize) -> bool {
        self.drawn[edge]
    }

    /// Top edge of box `(x, y)`, `y` may equal the height for the bottom row.
    pub fn horizontal(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Left edge of box `(x, y)`, `x` may equal the width for the last column.
    pub fn vertical(&self, x: usize, y: usize) -> usize {
        self.width * (self.height + 1) + y * (self.width + 1) + x
    }

    /// Draws a line for the player on move.
    pub fn play(&mut self, edge: usize) {
        let player = self.turn;
        self.apply_move(Line { player, edge });
    }

    fn sides(&self, b: usize) -> usize {
        let (x, y) = (b % self.width, b / self.width);
        [
            self.horizontal(x, y),
            self.horizontal(x, y + 1),
            self.vertical(x, y),
            self.vertical(x + 1, y),
        ]
        .iter()
        .filter(|&&e| self.drawn[e])
        .count()
    }

    /// The up to two boxes bordering an edge.
    fn adjacent(&self, edge: usize) -> [Option<usize>; 2] {
        let horizontal = self.width * (self.height + 1);
        if edge < horizontal {
            let (x, y) = (edge % self.width, edge / self.width);
            [
                (y > 0).then(|| (y - 1) * self.width + x),
                (y < self.height).then(|| y * self.width + x),
            ]
        } else {
            let i = edge - horizontal;
            let (x, y) = (i % (self.width + 1), i / (self.width + 1));
            [
                (x > 0).then(|| y * self.width + x - 1),
                (x < self.width).then(|| y * self.width + x),
            ]
        }
    }
}

impl GameState for Boxes {
    type Move = Line;

    fn turn(&self) -> usize {
        self.turn
    }

    fn legal_moves(&self) -> Vec<Line> {
        if self.is_terminal() {
            return Vec::new();
        }
        let player = self.turn;
        (0..self.drawn.len())
            .filter(|&edge| !self.drawn[edge])
            .map(|edge| Line { player, edge })
            .collect()
    }

    fn apply_move(&mut self, line: Line) {
        assert!(
            line.edge < self.drawn.len() && !self.drawn[line.edge],
            "illegal {line:?}"
        );
        assert_eq!(line.player, self.turn, "{line:?} out of turn");
        self.drawn[line.edge] = true;

        let mut boxes = [None; 2];
        for (slot, b) in boxes.iter_mut().zip(self.adjacent(line.edge)) {
            if let Some(b) = b.filter(|&b| self.sides(b) == 4) {
                self.owners[b] = Some(line.player as u8);
                self.score[line.player] += 1;
                *slot = Some(b);
            }
        }
        if boxes.iter().all(Option::is_none) {
            self.turn = 1 - self.turn;
        }
        self.history.push(Claim { line, boxes });
    }

    fn undo_move(&mut self) -> Line {
        let Claim { line, boxes } = self.history.pop().expect("no move to undo");
        for b in boxes.into_iter().flatten() {
            self.owners[b] = None;
            self.score[line.player] -= 1;
        }
        self.drawn[line.edge] = false;
        self.turn = line.player;
        line
    }

    fn winner(&self) -> Option<usize> {
        let total = self.owners.len();
        (0..2).find(|&p| 2 * self.score[p] > total)
    }

    fn is_draw(&self) -> bool {
        self.drawn.iter().all(|d| *d) && self.score[0] == self.score[1]
    }

    fn root_move(&self) -> Line {
        Line {
            player: self.turn,
            edge: self.drawn.len(),
        }
    }
}

impl Debug for Boxes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn style(player: u8) -> Style {
            match player {
                0 => Style::new().green(),
                _ => Style::new().yellow(),
            }
        }

        writeln!(f, "Boxes {{")?;
        for y in 0..=self.height {
            write!(f, "  +")?;
            for x in 0..self.width {
                let h = if self.drawn[self.horizontal(x, y)] { "---" } else { "   " };
                write!(f, "{h}+")?;
            }
            writeln!(f)?;
            if y == self.height {
                break;
            }
            write!(f, "  ")?;
            for x in 0..=self.width {
                let v = if self.drawn[self.vertical(x, y)] { '|' } else { ' ' };
                write!(f, "{v}")?;
                if x < self.width {
                    match self.owners[y * self.width + x] {
                        Some(p) => write!(f, " {} ", p.style(style(p)))?,
                        None => write!(f, "   ")?,
                    }
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "  Turn: {}, Score: {}:{}",
            self.turn, self.score[0], self.score[1]
        )?;
        writeln!(f, "}}")
    }
}

/// Box difference, with boxes that can be closed right away counting for
/// the player on move.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxesEval;

impl Evaluator<Boxes> for BoxesEval {
    fn evaluate(&self, state: &Boxes, _node: &Line, player: usize) -> i64 {
        let own = state.score[player] as i64;
        let other = state.score[1 - player] as i64;
        let open = (0..state.owners.len())
            .filter(|&b| state.sides(b) == 3)
            .count() as i64;
        let open = if state.turn == player { open } else { -open };
        (own - other) * 10 + open * 5
    }
}
