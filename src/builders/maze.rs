//! Solvable maze generation via recursive backtracking.

use rand::RngExt;
use serde::{Deserialize, Serialize};

use super::{BlockSpec, CYLINDER_MESH, SPHERE_MESH, default_cube_mesh};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeSpec {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_rows")]
    pub cols: usize,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default = "default_wall_height")]
    pub wall_height: u32,
    #[serde(default)]
    pub location: [f64; 3],
}

fn default_rows() -> usize {
    8
}
fn default_cell_size() -> f64 {
    300.0
}
fn default_wall_height() -> u32 {
    3
}

/// Carve a maze on a (rows*2+1) x (cols*2+1) grid; `true` is wall.
///
/// Depth-first backtracking guarantees every cell is reachable, so the
/// entrance (left of cell 0,0) always connects to the exit (right of the
/// bottom-right cell).
pub fn carve_grid(rows: usize, cols: usize, rng: &mut impl RngExt) -> Vec<Vec<bool>> {
    let height = rows * 2 + 1;
    let width = cols * 2 + 1;
    let mut walls = vec![vec![true; width]; height];

    let mut stack = vec![(0usize, 0usize)];
    walls[1][1] = false;

    while let Some(&(row, col)) = stack.last() {
        let mut advanced = false;
        for (dr, dc) in shuffled_directions(rng) {
            let next_row = row as isize + dr;
            let next_col = col as isize + dc;
            if next_row < 0
                || next_row >= rows as isize
                || next_col < 0
                || next_col >= cols as isize
            {
                continue;
            }
            let (next_row, next_col) = (next_row as usize, next_col as usize);
            if walls[next_row * 2 + 1][next_col * 2 + 1] {
                // Knock out the wall between the two cells
                let between_row = (row * 2 + 1) as isize + dr;
                let between_col = (col * 2 + 1) as isize + dc;
                walls[between_row as usize][between_col as usize] = false;
                walls[next_row * 2 + 1][next_col * 2 + 1] = false;
                stack.push((next_row, next_col));
                advanced = true;
                break;
            }
        }
        if !advanced {
            stack.pop();
        }
    }

    // Entrance on the left, exit on the right
    walls[1][0] = false;
    walls[rows * 2 - 1][cols * 2] = false;

    walls
}

fn shuffled_directions(rng: &mut impl RngExt) -> [(isize, isize); 4] {
    let mut dirs = [(0isize, 1isize), (1, 0), (0, -1), (-1, 0)];
    for i in (1..dirs.len()).rev() {
        let j = rng.random_range(0..=i);
        dirs.swap(i, j);
    }
    dirs
}

pub fn maze(spec: &MazeSpec, rng: &mut impl RngExt) -> Vec<BlockSpec> {
    let walls = carve_grid(spec.rows, spec.cols, rng);
    let height = spec.rows * 2 + 1;
    let width = spec.cols * 2 + 1;
    let cell = spec.cell_size;
    let scale = cell / 100.0;
    let mesh = default_cube_mesh();

    let mut blocks = Vec::new();
    for (r, row) in walls.iter().enumerate() {
        for (c, &is_wall) in row.iter().enumerate() {
            if !is_wall {
                continue;
            }
            for h in 0..spec.wall_height {
                blocks.push(
                    BlockSpec::new(
                        format!("Maze_Wall_{}_{}_{}", r, c, h),
                        &mesh,
                        [
                            spec.location[0] + (c as f64 - width as f64 / 2.0) * cell,
                            spec.location[1] + (r as f64 - height as f64 / 2.0) * cell,
                            spec.location[2] + h as f64 * cell,
                        ],
                    )
                    .with_uniform_scale(scale),
                );
            }
        }
    }

    blocks.push(
        BlockSpec::new(
            "Maze_Entrance",
            CYLINDER_MESH,
            [
                spec.location[0] - width as f64 / 2.0 * cell - cell,
                spec.location[1] + (1.0 - height as f64 / 2.0) * cell,
                spec.location[2] + cell,
            ],
        )
        .with_uniform_scale(0.5),
    );
    blocks.push(
        BlockSpec::new(
            "Maze_Exit",
            SPHERE_MESH,
            [
                spec.location[0] + width as f64 / 2.0 * cell + cell,
                spec.location[1] + ((spec.rows * 2 - 1) as f64 - height as f64 / 2.0) * cell,
                spec.location[2] + cell,
            ],
        )
        .with_uniform_scale(0.5),
    );

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    #[test]
    fn every_cell_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = 8;
        let cols = 8;
        let walls = carve_grid(rows, cols, &mut rng);

        // BFS over open grid squares from the first cell
        let height = rows * 2 + 1;
        let width = cols * 2 + 1;
        let mut seen = vec![vec![false; width]; height];
        let mut queue = VecDeque::from([(1usize, 1usize)]);
        seen[1][1] = true;
        while let Some((r, c)) = queue.pop_front() {
            for (dr, dc) in [(0isize, 1isize), (1, 0), (0, -1), (-1, 0)] {
                let (nr, nc) = (r as isize + dr, c as isize + dc);
                if nr < 1 || nr >= height as isize - 1 || nc < 1 || nc >= width as isize - 1 {
                    continue;
                }
                let (nr, nc) = (nr as usize, nc as usize);
                if !walls[nr][nc] && !seen[nr][nc] {
                    seen[nr][nc] = true;
                    queue.push_back((nr, nc));
                }
            }
        }

        for row in 0..rows {
            for col in 0..cols {
                assert!(seen[row * 2 + 1][col * 2 + 1], "cell {row},{col} walled off");
            }
        }
        // Entrance and exit are open
        assert!(!walls[1][0]);
        assert!(!walls[rows * 2 - 1][cols * 2]);
    }

    #[test]
    fn block_count_matches_wall_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let spec = MazeSpec {
            rows: 4,
            cols: 5,
            cell_size: 300.0,
            wall_height: 2,
            location: [0.0, 0.0, 0.0],
        };
        let wall_count: usize = carve_grid(spec.rows, spec.cols, &mut StdRng::seed_from_u64(42))
            .iter()
            .flatten()
            .filter(|&&w| w)
            .count();

        let blocks = maze(&spec, &mut rng);
        // Two marker actors on top of the stacked wall blocks
        assert_eq!(blocks.len(), wall_count * 2 + 2);
        assert!(blocks.iter().any(|b| b.name == "Maze_Entrance"));
        assert!(blocks.iter().any(|b| b.name == "Maze_Exit"));
    }

    #[test]
    fn same_seed_same_maze() {
        let spec = MazeSpec {
            rows: 6,
            cols: 6,
            cell_size: 300.0,
            wall_height: 1,
            location: [0.0, 0.0, 0.0],
        };
        let a = maze(&spec, &mut StdRng::seed_from_u64(1));
        let b = maze(&spec, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.len(), b.len());
        assert!(
            a.iter()
                .zip(&b)
                .all(|(x, y)| x.name == y.name && x.location == y.location)
        );
    }
}
