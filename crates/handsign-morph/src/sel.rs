//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological operations.

use crate::{MorphError, MorphResult};

/// Element type in a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelElement {
    /// Don't care - this position is ignored
    #[default]
    DontCare = 0,
    /// Hit - must match foreground (set pixels)
    Hit = 1,
}

/// Structuring Element (SEL)
///
/// Defines the neighborhood pattern for morphological operations.
/// The origin (cx, cy) is the reference point for the operation.
#[derive(Debug, Clone)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    data: Vec<SelElement>,
    name: Option<String>,
}

impl Sel {
    /// Create a new structuring element of don't-care elements,
    /// with the origin at the center.
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "zero-sized sel: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![SelElement::DontCare; (width * height) as usize],
            name: None,
        })
    }

    /// Create a rectangular "brick" structuring element with all hits
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        sel.data.fill(SelElement::Hit);
        sel.name = Some(format!("brick_{}x{}", width, height));
        Ok(sel)
    }

    /// Create an elliptical structuring element inscribed in a
    /// `width x height` box.
    ///
    /// Row `i` of the element, at vertical offset `dy = i - rows / 2`,
    /// holds hits over `cx - dx ..= cx + dx` with
    /// `dx = round(cx * sqrt(1 - dy^2 / r^2))`, `r = height / 2`.
    pub fn create_ellipse(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        let r = (height / 2) as i64;
        let c = (width / 2) as i64;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        for i in 0..height as i64 {
            let dy = i - r;
            if dy.abs() > r {
                continue;
            }
            let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i64;
            let j1 = (c - dx).max(0);
            let j2 = (c + dx + 1).min(width as i64);
            for j in j1..j2 {
                sel.set_element(j as u32, i as u32, SelElement::Hit);
            }
        }
        sel.name = Some(format!("ellipse_{}x{}", width, height));
        Ok(sel)
    }

    /// Create a circular structuring element of the given radius
    /// (side `2 * radius + 1`).
    pub fn create_disk(radius: u32) -> MorphResult<Self> {
        let size = 2 * radius + 1;
        Self::create_ellipse(size, size)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin x coordinate
    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    /// Get the origin y coordinate
    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Get the name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get an element at (x, y)
    #[inline]
    pub fn get_element(&self, x: u32, y: u32) -> Option<SelElement> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    /// Set an element at (x, y); out-of-range positions are ignored.
    #[inline]
    pub fn set_element(&mut self, x: u32, y: u32, elem: SelElement) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = elem;
        }
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&e| e == SelElement::Hit).count()
    }

    /// Iterate over hit positions relative to origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;

        self.data
            .iter()
            .enumerate()
            .filter_map(move |(idx, &elem)| {
                if elem == SelElement::Hit {
                    let x = (idx as u32 % width) as i32;
                    let y = (idx as u32 / width) as i32;
                    Some((x - cx, y - cy))
                } else {
                    None
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_widths(sel: &Sel) -> Vec<usize> {
        (0..sel.height())
            .map(|y| {
                (0..sel.width())
                    .filter(|&x| sel.get_element(x, y) == Some(SelElement::Hit))
                    .count()
            })
            .collect()
    }

    #[test]
    fn test_brick() {
        let sel = Sel::create_brick(3, 5).unwrap();
        assert_eq!(sel.hit_count(), 15);
        assert_eq!(sel.origin_x(), 1);
        assert_eq!(sel.origin_y(), 2);
        assert_eq!(sel.name(), Some("brick_3x5"));
    }

    #[test]
    fn test_disk_radius_5() {
        let sel = Sel::create_disk(5).unwrap();
        assert_eq!(sel.width(), 11);
        assert_eq!(row_widths(&sel), vec![1, 7, 9, 11, 11, 11, 11, 11, 9, 7, 1]);
        assert_eq!(sel.hit_count(), 89);
        assert_eq!(sel.get_element(5, 0), Some(SelElement::Hit));
        assert_eq!(sel.get_element(4, 0), Some(SelElement::DontCare));
    }

    #[test]
    fn test_hit_offsets_symmetric() {
        let sel = Sel::create_disk(5).unwrap();
        let offsets: Vec<_> = sel.hit_offsets().collect();
        for &(dx, dy) in &offsets {
            assert!(offsets.contains(&(-dx, -dy)));
            assert!(dx.abs() <= 5 && dy.abs() <= 5);
        }
        assert!(offsets.contains(&(0, 0)));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Sel::new(0, 3).is_err());
    }
}
