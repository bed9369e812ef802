/// Returns every cell of an `nx` × `ny` mask as `(x, y)`, spiraling inward.
///
/// The walk starts at `(0, 0)`, runs along the bottom edge, up the right edge,
/// back along the top and down the left, then repeats one ring further in.
/// Square masks yield every cell exactly once.
pub(super) fn spiral(nx: usize, ny: usize) -> Vec<(usize, usize)> {
    let total = nx * ny;
    let mut cells = Vec::with_capacity(total);
    if total == 0 {
        return cells;
    }

    #[allow(clippy::cast_possible_wrap)]
    let (mut x_last, mut y_last) = (nx as isize - 1, ny as isize - 1);
    let (mut x_first, mut y_first) = (0_isize, 1_isize);
    let (mut x, mut y) = (0_isize, 0_isize);
    let mut heading = Heading::Right;

    for _ in 0..total {
        if let (Ok(cx), Ok(cy)) = (usize::try_from(x), usize::try_from(y))
            && cx < nx
            && cy < ny
        {
            cells.push((cx, cy));
        }

        match heading {
            Heading::Right => {
                x += 1;
                if x >= x_last {
                    x_last -= 1;
                    heading = Heading::Up;
                }
            }
            Heading::Up => {
                y += 1;
                if y >= y_last {
                    y_last -= 1;
                    heading = Heading::Left;
                }
            }
            Heading::Left => {
                x -= 1;
                if x <= x_first {
                    x_first += 1;
                    heading = Heading::Down;
                }
            }
            Heading::Down => {
                y -= 1;
                if y <= y_first {
                    y_first += 1;
                    heading = Heading::Right;
                }
            }
        }
    }

    cells
}

#[derive(Debug, Clone, Copy)]
enum Heading {
    Right,
    Up,
    Left,
    Down,
}
