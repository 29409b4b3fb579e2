use std::fmt::{self, Debug};

use owo_colors::{OwoColorize, Style};

use crate::search::{Evaluator, GameState, Move};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Places a mark of `player` on `cell` (row major, top left is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark {
    pub player: usize,
    pub cell: usize,
}

impl Mark {
    /// Cell of the synthetic root move.
    pub const ROOT: usize = 9;
}

impl Move for Mark {
    fn player(&self) -> usize {
        self.player
    }
}

/// Tic-tac-toe where `x` (player 0) starts.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<u8>; 9],
    history: Vec<Mark>,
}

impl TicTacToe {
    /// Owner of a cell.
    pub fn get(&self, cell: usize) -> Option<usize> {
        self.cells[cell].map(usize::from)
    }

    /// Places a mark for the player on move.
    pub fn play(&mut self, cell: usize) {
        let player = self.turn();
        self.apply_move(Mark { player, cell });
    }

    /// Parses a board of `x`, `o` and `.` separated by whitespace.
    /// The player on move is derived from the number of marks.
    pub fn parse(txt: &str) -> Option<TicTacToe> {
        let mut cells = [None; 9];
        let mut count = 0;
        for (i, token) in txt.split_whitespace().enumerate() {
            if i >= cells.len() {
                return None;
            }
            cells[i] = match token.chars().next()? {
                'x' | 'X' => Some(0),
                'o' | 'O' => Some(1),
                '.' | '_' | '-' => None,
                _ => return None,
            };
            count += 1;
        }
        if count != cells.len() {
            return None;
        }

        let x = cells.iter().filter(|c| **c == Some(0)).count();
        let o = cells.iter().filter(|c| **c == Some(1)).count();
        if x != o && x != o + 1 {
            return None;
        }
        Some(TicTacToe {
            cells,
            history: Vec::new(),
        })
    }
}

impl GameState for TicTacToe {
    type Move = Mark;

    fn turn(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count() % 2
    }

    fn legal_moves(&self) -> Vec<Mark> {
        if self.winner().is_some() {
            return Vec::new();
        }
        let player = self.turn();
        (0..9)
            .filter(|&cell| self.cells[cell].is_none())
            .map(|cell| Mark { player, cell })
            .collect()
    }

    fn apply_move(&mut self, m: Mark) {
        assert!(m.cell < 9 && self.cells[m.cell].is_none(), "illegal {m:?}");
        assert_eq!(m.player, self.turn(), "{m:?} out of turn");
        self.cells[m.cell] = Some(m.player as u8);
        self.history.push(m);
    }

    fn undo_move(&mut self) -> Mark {
        let m = self.history.pop().expect("no move to undo");
        self.cells[m.cell] = None;
        m
    }

    fn winner(&self) -> Option<usize> {
        LINES.iter().find_map(|&[a, b, c]| {
            let owner = self.cells[a]?;
            (self.cells[b] == Some(owner) && self.cells[c] == Some(owner))
                .then_some(owner as usize)
        })
    }

    fn is_draw(&self) -> bool {
        self.cells.iter().all(|c| c.is_some()) && self.winner().is_none()
    }

    fn root_move(&self) -> Mark {
        Mark {
            player: self.turn(),
            cell: Mark::ROOT,
        }
    }
}

impl Debug for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn style(player: u8) -> Style {
            match player {
                0 => Style::new().green(),
                _ => Style::new().yellow(),
            }
        }

        writeln!(f, "TicTacToe {{")?;
        for row in self.cells.chunks(3) {
            write!(f, "  ")?;
            for cell in row {
                match cell {
                    Some(0) => write!(f, "{} ", "x".style(style(0)))?,
                    Some(p) => write!(f, "{} ", "o".style(style(*p)))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  Turn: {}", self.turn())?;
        writeln!(f, "}}")
    }
}

/// Counts the lines that are still open for each player.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeEval;

impl Evaluator<TicTacToe> for TicTacToeEval {
    fn evaluate(&self, state: &TicTacToe, _node: &Mark, player: usize) -> i64 {
        let player = player as u8;
        LINES
            .iter()
            .map(|line| {
                let own = line.iter().filter(|&&c| state.cells[c] == Some(player)).count() as i64;
                let other = line
                    .iter()
                    .filter(|&&c| matches!(state.cells[c], Some(p) if p != player))
                    .count() as i64;
                match (own, other) {
                    (own, 0) => own * own,
                    (0, other) => -other * other,
                    _ => 0,
                }
            })
            .sum()
    }
}
