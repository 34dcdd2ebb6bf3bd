//! Session driver wiring the world, the pathfinder and the collaborators.

use std::time::Duration;

use anyhow::Result;
use log::{debug, info};
use scrollmap_core::{CellCoord, Command, Event, LevelId, MovementKey};
use scrollmap_rendering::{present, Renderer, ViewportPresentation};
use scrollmap_system_pathfinding::{Pathfinder, SliceReport};
use scrollmap_world::{self as world, query, World};

use crate::{
    config::Settings,
    loader::LevelLoader,
    scheduler::{Firing, Scheduler},
    script::ScriptStep,
    text::capture_frame,
};

/// Single-threaded session pumping commands through the world.
///
/// Every command's events are forwarded to the pathfinder and the renderer
/// before the next command runs. Level loads requested by a command are
/// serviced once that command has been fully applied, so the loader is never
/// invoked from inside a tick.
#[derive(Debug)]
pub struct Session<L, R> {
    world: World,
    pathfinder: Pathfinder,
    scheduler: Scheduler,
    viewport: ViewportPresentation,
    loader: L,
    renderer: R,
    frame_every_tick: bool,
}

impl<L, R> Session<L, R>
where
    L: LevelLoader,
    R: Renderer,
{
    /// Creates a session from resolved settings.
    pub fn new(settings: &Settings, loader: L, renderer: R) -> Result<Self> {
        Ok(Self {
            world: World::with_config(settings.session_config()),
            pathfinder: Pathfinder::new(settings.pathfinder_config()),
            scheduler: Scheduler::new(settings.tick_period(), settings.slice_period())?,
            viewport: ViewportPresentation::new(settings.cell_size)?,
            loader,
            renderer,
            frame_every_tick: settings.frames,
        })
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Renderer receiving notifications.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Level loader serving requests.
    #[must_use]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Consumes the session, returning the renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Time elapsed on the simulated clock.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Requests the first level and waits for the loader.
    pub fn start(&mut self, level: LevelId, start: Option<CellCoord>) -> Result<()> {
        info!("starting at level {level}");
        self.submit(Command::RequestLevel { level, start })
    }

    /// Forwards a key press.
    pub fn key_down(&mut self, key: MovementKey) -> Result<()> {
        self.submit(Command::KeyDown { key })
    }

    /// Forwards a key release.
    pub fn key_up(&mut self, key: MovementKey) -> Result<()> {
        self.submit(Command::KeyUp { key })
    }

    /// Forwards a pointer click on a grid cell.
    pub fn click(&mut self, destination: CellCoord) -> Result<()> {
        self.submit(Command::RequestPath { destination })
    }

    /// Runs every timer firing that falls due within `elapsed`.
    ///
    /// Returns the number of movement ticks that ran.
    pub fn advance(&mut self, elapsed: Duration) -> Result<u32> {
        let mut ticks = 0;
        for firing in self.scheduler.advance(elapsed) {
            match firing {
                Firing::SearchSlice => {
                    let _ = self.search_slice()?;
                }
                Firing::MovementTick => {
                    self.submit(Command::Tick)?;
                    ticks += 1;
                    if self.frame_every_tick {
                        self.draw_frame()?;
                    }
                }
            }
        }
        Ok(ticks)
    }

    /// Draws the current frame, if a level is loaded.
    pub fn draw_frame(&mut self) -> Result<()> {
        match capture_frame(&self.world) {
            Some(frame) => self.renderer.frame(&frame),
            None => Ok(()),
        }
    }

    /// Executes one script instruction.
    pub fn perform(&mut self, step: ScriptStep) -> Result<()> {
        match step {
            ScriptStep::Press(key) => self.key_down(key),
            ScriptStep::Release(key) => self.key_up(key),
            ScriptStep::Click(cell) => self.click(cell),
            ScriptStep::Wait(duration) => self.advance(duration).map(|_| ()),
            ScriptStep::Frame => self.draw_frame(),
        }
    }

    fn search_slice(&mut self) -> Result<SliceReport> {
        let Some(graph) = query::path_graph(&self.world) else {
            return Ok(SliceReport::default());
        };
        let mut commands = Vec::new();
        let report = self.pathfinder.tick_search(graph, &mut commands);
        for command in commands {
            self.submit(command)?;
        }
        Ok(report)
    }

    fn submit(&mut self, command: Command) -> Result<()> {
        let mut queue = vec![command];
        while let Some(command) = queue.pop() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            self.pathfinder
                .handle(&events, query::path_graph(&self.world));
            present(&mut self.renderer, &self.viewport, &events)?;

            for event in &events {
                if let Event::LevelRequested { level } = event {
                    queue.push(self.fetch(*level));
                }
            }
        }
        Ok(())
    }

    fn fetch(&mut self, level: LevelId) -> Command {
        match self.loader.load(level) {
            Ok(data) => Command::LoadLevel { level, data },
            Err(error) => {
                debug!("loader failed for level {level}: {error:#}");
                Command::LevelLoadFailed {
                    level,
                    reason: format!("{error:#}"),
                }
            }
        }
    }
}
