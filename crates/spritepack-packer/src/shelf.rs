//! Deterministic shelf placement.
//!
//! Frames are placed on horizontal shelves, tallest first, with ties broken
//! by width and then by input position. Input position is significant: the
//! caller hands frames in the deterministic filename order, so identical
//! inputs always produce identical placements and identical sheet splits.

/// Placement of one input frame on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the frame in the caller's input slice.
    pub index: usize,
    /// X offset within the sheet.
    pub x: u32,
    /// Y offset within the sheet.
    pub y: u32,
}

/// One packed sheet: trimmed dimensions plus the placements it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSheet {
    /// Used width (widest shelf).
    pub width: u32,
    /// Used height (bottom of the last shelf).
    pub height: u32,
    /// Frame placements, in placement order.
    pub placements: Vec<Placement>,
}

#[derive(Debug)]
struct Shelf {
    y: u32,
    height: u32,
    current_x: u32,
}

#[derive(Debug, Default)]
struct OpenSheet {
    shelves: Vec<Shelf>,
    placements: Vec<Placement>,
}

impl OpenSheet {
    fn close(self) -> PackedSheet {
        let width = self.shelves.iter().map(|s| s.current_x).max().unwrap_or(0);
        let height = self.shelves.last().map_or(0, |s| s.y + s.height);
        PackedSheet {
            width,
            height,
            placements: self.placements,
        }
    }
}

/// Pack `sizes` (width, height pairs) into one or more sheets.
///
/// `max_width` bounds shelf width and `max_height` bounds sheet height: when
/// a frame no longer fits vertically the sheet is closed and a new one opened.
/// With `max_height = None` everything lands on a single sheet. The caller
/// must ensure every frame fits within `max_width` (and `max_height` when
/// bounded).
pub fn pack_shelves(
    sizes: &[(u32, u32)],
    max_width: u32,
    max_height: Option<u32>,
) -> Vec<PackedSheet> {
    if sizes.is_empty() {
        return Vec::new();
    }

    // Sort by height desc, width desc, input position asc.
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| {
        sizes[b]
            .1
            .cmp(&sizes[a].1)
            .then(sizes[b].0.cmp(&sizes[a].0))
            .then(a.cmp(&b))
    });

    let mut sheets: Vec<PackedSheet> = Vec::new();
    let mut open = OpenSheet::default();

    for index in order {
        let (width, height) = sizes[index];

        if let Some(shelf) = open
            .shelves
            .iter_mut()
            .find(|s| s.current_x + width <= max_width && height <= s.height)
        {
            open.placements.push(Placement {
                index,
                x: shelf.current_x,
                y: shelf.y,
            });
            shelf.current_x += width;
            continue;
        }

        let mut shelf_y = open.shelves.last().map_or(0, |s| s.y + s.height);
        if max_height.is_some_and(|max| shelf_y + height > max) && !open.shelves.is_empty() {
            sheets.push(std::mem::take(&mut open).close());
            shelf_y = 0;
        }

        open.placements.push(Placement {
            index,
            x: 0,
            y: shelf_y,
        });
        open.shelves.push(Shelf {
            y: shelf_y,
            height,
            current_x: width,
        });
    }

    sheets.push(open.close());
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    #[test]
    fn empty_input_yields_no_sheets() {
        assert!(pack_shelves(&[], 128, None).is_empty());
    }

    #[test]
    fn single_sheet_holds_everything_when_unbounded() {
        let sizes = vec![(64, 64), (32, 16), (16, 32), (8, 8)];
        let sheets = pack_shelves(&sizes, 128, None);
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].placements.len(), 4);
    }

    #[test]
    fn placements_never_overlap() {
        let sizes = vec![(30, 30), (30, 30), (30, 30), (20, 10), (10, 20), (5, 5)];
        let sheets = pack_shelves(&sizes, 64, None);
        let rects: Vec<_> = sheets[0]
            .placements
            .iter()
            .map(|p| (p.x, p.y, sizes[p.index].0, sizes[p.index].1))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!overlaps(*a, *b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn bounded_height_splits_into_multiple_sheets() {
        let sizes = vec![(32, 32); 5];
        let sheets = pack_shelves(&sizes, 32, Some(64));
        assert_eq!(sheets.len(), 3);
        let total: usize = sheets.iter().map(|s| s.placements.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn dimensions_are_trimmed_to_used_extent() {
        let sheets = pack_shelves(&[(10, 20), (5, 5)], 128, None);
        assert_eq!(sheets[0].width, 15);
        assert_eq!(sheets[0].height, 20);
    }

    #[test]
    fn identical_inputs_pack_identically() {
        let sizes = vec![(17, 9), (3, 30), (30, 3), (9, 17)];
        assert_eq!(
            pack_shelves(&sizes, 40, Some(40)),
            pack_shelves(&sizes, 40, Some(40))
        );
    }
}
