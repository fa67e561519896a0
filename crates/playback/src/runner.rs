//! The forever loop around [`Player::tick`].

use embassy_time::{Duration, Instant, Ticker};
use platform::{AudioEngine, CoverDisplay, Indicator, InputDevice, Storage};

use crate::player::Player;

/// Poll `input` and tick `player` every `period`. Never returns.
///
/// A failed tick is logged and the loop carries on; the player is left
/// consistent after every error.
pub async fn run<S, A, I, D, In>(player: &mut Player<S, A, I, D>, input: &mut In, period: Duration)
where
    S: Storage,
    A: AudioEngine,
    I: Indicator,
    D: CoverDisplay,
    In: InputDevice,
{
    let mut ticker = Ticker::every(period);
    loop {
        let snapshot = input.poll();
        if let Err(err) = player.tick(snapshot, Instant::now()).await {
            error!("tick failed: {}", err.as_str());
        }
        ticker.next().await;
    }
}
