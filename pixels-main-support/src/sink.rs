use crate::palette::{CellLook, Palette};
use wireworld::{CellLayout, CellState, Loc, PixelSize, RenderRejected, RenderSink};

pub const BACKGROUND_COLOR: [u8; 4] = [0x00, 0x00, 0x00, 0xff];

/// Draws cells straight into an RGBA frame that keeps its contents between renders.
pub struct FrameSink<'a> {
    frame: &'a mut [u8],
    size: PixelSize,
    layout: CellLayout,
    palette: &'a mut Palette,
}

impl<'a> FrameSink<'a> {
    pub fn new(
        frame: &'a mut [u8],
        size: PixelSize,
        layout: CellLayout,
        palette: &'a mut Palette,
    ) -> Self {
        Self {
            frame,
            size,
            layout,
            palette,
        }
    }

    fn paint_cell(&mut self, loc: Loc, look: CellLook) -> Result<(), RenderRejected> {
        let width = self.size.width as usize;
        if self.frame.len() != width * self.size.height as usize * 4 {
            return Err(RenderRejected::NotReady);
        }
        let rect = self.layout.cell_rect(loc);
        if rect.x + rect.width > self.size.width || rect.y + rect.height > self.size.height {
            return Err(RenderRejected::OutsideSurface(loc));
        }

        for y in rect.y..rect.y + rect.height {
            let start = (y as usize * width + rect.x as usize) * 4;
            let row = &mut self.frame[start..start + rect.width as usize * 4];
            for (x, pixel) in (rect.x..).zip(row.chunks_exact_mut(4)) {
                pixel.copy_from_slice(&look.pixel(x, y));
            }
        }
        Ok(())
    }
}

impl RenderSink for FrameSink<'_> {
    fn fill_cells(&mut self, state: CellState, cells: &[Loc]) -> Result<(), RenderRejected> {
        let Some(look) = self.palette.look(state) else {
            return cells.iter().try_for_each(|loc| self.clear_cell(*loc));
        };
        cells.iter().try_for_each(|loc| self.paint_cell(*loc, look))
    }

    fn clear_cell(&mut self, loc: Loc) -> Result<(), RenderRejected> {
        self.paint_cell(loc, CellLook::Solid(BACKGROUND_COLOR))
    }

    fn clear_all(&mut self) -> Result<(), RenderRejected> {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND_COLOR);
        }
        Ok(())
    }

    fn circuit_regenerated(&mut self) {
        self.palette.reroll();
    }
}
