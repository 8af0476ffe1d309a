use super::color::Rgba;

/// 2D drawing operations the particle loop needs from a canvas.
pub trait DrawSurface {
    /// Set the backing pixel size.
    fn set_size(&mut self, width: u32, height: u32);
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, line_width: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: Rgba,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgba,
        line_width: f64,
    },
}

/// Keeps the commands of the most recent frame. Used for headless runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: (u32, u32),
    pub commands: Vec<DrawCommand>,
    pub clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear(&mut self, _width: f64, _height: f64) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, line_width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        });
    }
}
