// src/backends/mock.rs

use crate::backends::{BackendEvent, Driver};
use anyhow::Result;

pub struct MockDriver {
    events: Vec<BackendEvent>,
    width: u32,
    height: u32,
    framebuffer: Vec<u8>,
    pub presented_frames: usize,
    pub titles: Vec<String>,
}

impl MockDriver {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            events: Vec::new(),
            width,
            height,
            framebuffer: vec![0u8; width as usize * height as usize * 4],
            presented_frames: 0,
            titles: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: BackendEvent) {
        self.events.push(event);
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }
}

impl Driver for MockDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        Ok(self.events.drain(..).collect())
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn framebuffer_mut(&mut self) -> &mut [u8] {
        &mut self.framebuffer
    }

    fn present(&mut self) -> Result<()> {
        self.presented_frames += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}
