use crate::model::OptimizationResult;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws one board of a result in ASCII, raw board outline included.
pub fn render_board(result: &OptimizationResult, board_id: usize) -> String {
    let board_w = result.debug.board_width;
    let board_h = result.debug.board_height;
    if board_w <= 0.0 || board_h <= 0.0 {
        return String::new();
    }

    let scale = f64::min(MAX_WIDTH / board_w, MAX_HEIGHT / board_h);
    let grid_w = (board_w * scale).round() as usize;
    let grid_h = (board_h * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in result.placements.iter().filter(|p| p.board_id == board_id) {
        let sx = (p.x_mm * scale).round() as usize;
        let sy = (p.y_mm * scale).round() as usize;
        let sw = (p.w_mm * scale).round() as usize;
        let sh = (p.h_mm * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label = if p.rot_deg == 90 {
            format!("{}*", p.id)
        } else {
            p.id.clone()
        };
        let label_chars: Vec<char> = label.chars().collect();

        if sw > 2 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label_chars.len() / 2);

            for (i, &ch) in label_chars.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut out = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    let horizontal = |c: char| if c == '|' || c == '+' { '+' } else { '-' };
    let vertical = |c: char| if c == '-' || c == '+' { '+' } else { '|' };

    for i in x..=x + w {
        if i >= cols {
            break;
        }
        for row in [y, y + h] {
            if row < rows {
                grid[row][i] = horizontal(grid[row][i]);
            }
        }
    }

    for j in y..=y + h {
        if j >= rows {
            break;
        }
        for col in [x, x + w] {
            if col < cols {
                grid[j][col] = vertical(grid[j][col]);
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
