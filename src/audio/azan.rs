use crate::audio::player::Playback;

pub type PlayerFactory = Box<dyn Fn() -> Option<Box<dyn Playback>>>;

/// Play/stop toggle over a lazily built playback handle.
///
/// Failures are logged and never surface to the caller: the widget keeps
/// rendering whatever it was rendering.
pub struct AzanToggle {
    factory: PlayerFactory,
    handle: Option<Box<dyn Playback>>,
    /// Set after the first factory call, whether or not it produced a player.
    built: bool,
    playing: bool,
}

impl AzanToggle {
    pub fn new(factory: PlayerFactory) -> Self {
        Self {
            factory,
            handle: None,
            built: false,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle(&mut self) {
        if !self.built {
            self.handle = (self.factory)();
            self.built = true;
        }
        let Some(handle) = self.handle.as_mut() else {
            log::error!("Error playing azan: no audio player available");
            return;
        };

        if self.playing {
            handle.pause();
            handle.rewind();
            self.playing = false;
            return;
        }

        if !handle.is_at_start() {
            handle.rewind();
        }
        match handle.play() {
            Ok(()) => self.playing = true,
            Err(e) => log::error!("Error playing azan: {:#}", e),
        }
    }

    /// Called on every tick; clears the flag once the clip finishes by itself.
    pub fn poll(&mut self) {
        if !self.playing {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            if handle.poll_ended() {
                log::debug!("Azan finished");
                self.playing = false;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::PlayerFactory;
    use crate::audio::player::Playback;

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub built: usize,
        pub playing: bool,
        pub position_secs: u32,
        pub plays: usize,
        pub fail_play: bool,
        pub finish_next_poll: bool,
    }

    pub struct FakePlayback(pub Rc<RefCell<FakeState>>);

    impl Playback for FakePlayback {
        fn play(&mut self) -> Result<()> {
            let mut state = self.0.borrow_mut();
            if state.fail_play {
                return Err(anyhow!("autoplay blocked"));
            }
            state.playing = true;
            state.plays += 1;
            state.position_secs += 3;
            Ok(())
        }

        fn pause(&mut self) {
            self.0.borrow_mut().playing = false;
        }

        fn rewind(&mut self) {
            self.0.borrow_mut().position_secs = 0;
        }

        fn is_at_start(&self) -> bool {
            self.0.borrow().position_secs == 0
        }

        fn poll_ended(&mut self) -> bool {
            let mut state = self.0.borrow_mut();
            if state.playing && state.finish_next_poll {
                state.playing = false;
                state.finish_next_poll = false;
                return true;
            }
            false
        }
    }

    pub fn fake_factory() -> (PlayerFactory, Rc<RefCell<FakeState>>) {
        let state = Rc::new(RefCell::new(FakeState::default()));
        let shared = Rc::clone(&state);
        let factory: PlayerFactory = Box::new(move || {
            shared.borrow_mut().built += 1;
            Some(Box::new(FakePlayback(Rc::clone(&shared))) as Box<dyn Playback>)
        });
        (factory, state)
    }
}
