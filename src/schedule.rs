//! Frame schedule
//!
//! Applications register their systems explicitly, in the order they should
//! run. Each frame runs every update system, then every render system.

use std::fmt;

use crate::display::Canvas;

/// Which half of the frame a system runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Update,
    Render,
}

/// Per-frame state handed to every system
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Seconds since the first frame
    pub elapsed: f32,
    /// Frames completed before this one
    pub frame: u64,
    /// Frame buffer size
    pub width: u32,
    pub height: u32,
    started: bool,
    quit: bool,
}

impl FrameContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Start the next frame
    pub fn advance(&mut self, dt: f32) {
        if self.started {
            self.frame += 1;
        }
        self.started = true;
        self.dt = dt;
        self.elapsed += dt;
    }

    /// Ask the engine to stop after the current frame
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// A unit of per-frame behaviour. Implement whichever hook the phase needs.
pub trait System {
    /// System name for logging/debugging
    fn name(&self) -> &str;

    /// Advance state (update phase)
    fn update(&mut self, _ctx: &mut FrameContext) {}

    /// Draw into the frame (render phase)
    fn render(&mut self, _ctx: &FrameContext, _canvas: &mut Canvas<'_>) {}
}

struct Entry {
    system: Box<dyn System>,
    update: bool,
    render: bool,
}

impl Entry {
    fn runs_in(&self, phase: Phase) -> bool {
        match phase {
            Phase::Update => self.update,
            Phase::Render => self.render,
        }
    }
}

/// Registered systems, in registration order
#[derive(Default)]
pub struct Schedule {
    entries: Vec<Entry>,
}

impl Schedule {
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::new()
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the systems that run in `phase`, in run order
    pub fn names(&self, phase: Phase) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.runs_in(phase))
            .map(|e| e.system.name())
            .collect()
    }

    /// Run one frame: all update systems, then all render systems
    pub fn run_frame(&mut self, ctx: &mut FrameContext, canvas: &mut Canvas<'_>) {
        for entry in self.entries.iter_mut().filter(|e| e.update) {
            entry.system.update(ctx);
        }
        for entry in self.entries.iter_mut().filter(|e| e.render) {
            entry.system.render(ctx, canvas);
        }
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("update", &self.names(Phase::Update))
            .field("render", &self.names(Phase::Render))
            .finish()
    }
}

#[derive(Default)]
pub struct ScheduleBuilder {
    schedule: Schedule,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `system` to run in `phase`, after anything already registered there
    pub fn with_system(mut self, phase: Phase, system: impl System + 'static) -> Self {
        self.add_system(&[phase], Box::new(system));
        self
    }

    /// Register one `system` instance in both phases, so its render hook
    /// sees the state its update hook produced
    pub fn with_stateful_system(mut self, system: impl System + 'static) -> Self {
        self.add_system(&[Phase::Update, Phase::Render], Box::new(system));
        self
    }

    pub fn add_system(&mut self, phases: &[Phase], system: Box<dyn System>) -> &mut Self {
        self.schedule.entries.push(Entry {
            system,
            update: phases.contains(&Phase::Update),
            render: phases.contains(&Phase::Render),
        });
        self
    }

    pub fn build(self) -> Schedule {
        self.schedule
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::color::Color;
    use crate::display::PixelBuffer;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn update(&mut self, _ctx: &mut FrameContext) {
            self.log.borrow_mut().push(format!("update:{}", self.name));
        }

        fn render(&mut self, _ctx: &FrameContext, _canvas: &mut Canvas<'_>) {
            self.log.borrow_mut().push(format!("render:{}", self.name));
        }
    }

    struct Plotter;

    impl System for Plotter {
        fn name(&self) -> &str {
            "plotter"
        }

        fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
            canvas.draw(ctx.frame as i32, 0, Color::WHITE);
        }
    }

    struct Quitter;

    impl System for Quitter {
        fn name(&self) -> &str {
            "quitter"
        }

        fn update(&mut self, ctx: &mut FrameContext) {
            if ctx.elapsed >= 1.0 {
                ctx.request_quit();
            }
        }
    }

    #[test]
    fn test_updates_run_before_renders_in_registration_order() {
        let log: Log = Rc::default();
        let recorder = |name: &'static str| Recorder {
            name,
            log: Rc::clone(&log),
        };
        let mut schedule = Schedule::builder()
            .with_system(Phase::Render, recorder("a"))
            .with_system(Phase::Update, recorder("b"))
            .with_system(Phase::Render, recorder("c"))
            .with_system(Phase::Update, recorder("d"))
            .build();

        let mut buf = PixelBuffer::with_size(1, 1);
        let mut canvas = Canvas::new(&mut buf);
        let mut ctx = FrameContext::new(1, 1);
        schedule.run_frame(&mut ctx, &mut canvas);

        assert_eq!(
            *log.borrow(),
            vec!["update:b", "update:d", "render:a", "render:c"]
        );
        assert_eq!(schedule.names(Phase::Update), vec!["b", "d"]);
        assert_eq!(schedule.len(), 4);
    }

    #[test]
    fn test_render_systems_draw_into_canvas() {
        let mut schedule = Schedule::builder()
            .with_system(Phase::Render, Plotter)
            .build();
        let mut buf = PixelBuffer::with_size(4, 1);
        let mut ctx = FrameContext::new(4, 1);
        for _ in 0..3 {
            ctx.advance(0.1);
            let mut canvas = Canvas::new(&mut buf);
            schedule.run_frame(&mut ctx, &mut canvas);
        }
        assert_eq!(buf.get(0, 0), Color::WHITE);
        assert_eq!(buf.get(2, 0), Color::WHITE);
        assert_eq!(buf.get(3, 0), Color::BLANK);
    }

    #[test]
    fn test_quit_request() {
        let mut schedule = Schedule::builder()
            .with_system(Phase::Update, Quitter)
            .build();
        let mut buf = PixelBuffer::with_size(1, 1);
        let mut ctx = FrameContext::new(1, 1);

        let mut frames = 0;
        while !ctx.quit_requested() {
            ctx.advance(0.25);
            let mut canvas = Canvas::new(&mut buf);
            schedule.run_frame(&mut ctx, &mut canvas);
            frames += 1;
        }
        assert_eq!(frames, 4);
        assert_eq!(ctx.frame, 3);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = ScheduleBuilder::new().build();
        assert!(schedule.is_empty());
        assert!(schedule.names(Phase::Render).is_empty());
    }

    #[test]
    fn test_stateful_system_runs_in_both_phases() {
        let log: Log = Rc::default();
        let mut schedule = Schedule::builder()
            .with_system(Phase::Render, Recorder {
                name: "first",
                log: Rc::clone(&log),
            })
            .with_stateful_system(Recorder {
                name: "both",
                log: Rc::clone(&log),
            })
            .build();

        let mut buf = PixelBuffer::with_size(1, 1);
        let mut canvas = Canvas::new(&mut buf);
        let mut ctx = FrameContext::new(1, 1);
        schedule.run_frame(&mut ctx, &mut canvas);

        assert_eq!(
            *log.borrow(),
            vec!["update:both", "render:first", "render:both"]
        );
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.names(Phase::Update), vec!["both"]);
    }
}
