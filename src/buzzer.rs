//! Hardware-PWM piezo buzzer for RP2040 / RP2350 using Embassy.
//! - Clock-independent: computes divider from clk_sys so 1 tick ≈ 1 µs
//! - 50 % duty at the tone frequency; on/off only toggles the slice enable

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};

use crate::sounder::AudioSink;

const TICKS_PER_SECOND: u32 = 1_000_000;

pub struct Buzzer<'d> {
    pwm: Pwm<'d>,
    cfg: Config, // Stored so toggling the enable keeps the divider
}

impl<'d> Buzzer<'d> {
    /// Configure the slice (output B) for `frequency_hz`, initially silent.
    /// e.g.: `Buzzer::new(Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, Config::default()), 1_000)`
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        clippy::cast_possible_truncation,
        reason = "Divider and top are clamped to their register widths"
    )]
    pub fn new(mut pwm: Pwm<'d>, frequency_hz: u32) -> Self {
        let clk = clk_sys_freq(); // Hz
        let div_int = (clk / TICKS_PER_SECOND).clamp(1, 255) as u8;
        let top = (TICKS_PER_SECOND / frequency_hz.max(1))
            .saturating_sub(1)
            .clamp(1, u32::from(u16::MAX)) as u16;

        let mut cfg = Config::default();
        cfg.top = top;
        cfg.phase_correct = false;
        cfg.divider = div_int.into();
        cfg.compare_b = top / 2 + 1;
        cfg.enable = false;
        pwm.set_config(&cfg);

        info!("buzzer clk={}Hz div={} top={}", clk, div_int, top);
        Self { pwm, cfg }
    }
}

impl AudioSink for Buzzer<'_> {
    fn set_tone(&mut self, on: bool) {
        if self.cfg.enable != on {
            self.cfg.enable = on;
            self.pwm.set_config(&self.cfg);
        }
    }
}
