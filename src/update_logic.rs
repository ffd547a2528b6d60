use crate::app_state::State;

impl State {
    pub fn update(&mut self) {
        let compositor = self.controller.compositor();
        self.committed_layer
            .sync(&self.gpu, &self.frame.buffer, compositor.committed());
        self.draft_layer
            .sync(&self.gpu, &self.frame.buffer, compositor.draft());
    }
}
