use std::time::Duration;

/// The delay and sound timers always count down at 60 Hz.
pub const TIMER_HZ: u32 = 60;

pub const DEFAULT_INSTRUCTION_HZ: u32 = 700;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Instruction,
    Timer,
}

/// Two independent periodic deadlines, one for instructions and one for the timers.
///
/// Time is measured from the start of the session. `next_due` hands out the ticks
/// that are due in the order they fell due, so a caller that is late catches up
/// on both clocks without ever coupling one to the other.
#[derive(Debug, Clone)]
pub struct Clock {
    instruction_period: Duration,
    timer_period: Duration,
    next_instruction: Duration,
    next_timer: Duration,
}

impl Clock {
    /// A rate of zero is treated as 1 Hz. The instruction period never drops
    /// below one nanosecond, so rates above 1 GHz all run at 1 GHz.
    pub fn new(instruction_hz: u32) -> Clock {
        let timer_period = Duration::from_secs(1) / TIMER_HZ;
        let instruction_period = Duration::from_secs(1) / instruction_hz.max(1);
        Clock {
            instruction_period: instruction_period.max(Duration::from_nanos(1)),
            timer_period,
            next_instruction: Duration::from_secs(0),
            next_timer: timer_period,
        }
    }

    pub fn instruction_period(&self) -> Duration {
        self.instruction_period
    }

    /// The earliest tick due at or before `now`, if any.
    /// On a tie the timers go first.
    pub fn next_due(&mut self, now: Duration) -> Option<Tick> {
        if self.next_timer <= self.next_instruction && self.next_timer <= now {
            self.next_timer += self.timer_period;
            Some(Tick::Timer)
        } else if self.next_instruction <= now {
            self.next_instruction += self.instruction_period;
            Some(Tick::Instruction)
        } else {
            None
        }
    }

    /// When the next tick of either kind falls due.
    pub fn next_deadline(&self) -> Duration {
        self.next_instruction.min(self.next_timer)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new(DEFAULT_INSTRUCTION_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn count_until(clock: &mut Clock, now: Duration) -> (usize, usize) {
        let mut counts = (0, 0);
        while let Some(tick) = clock.next_due(now) {
            match tick {
                Tick::Instruction => counts.0 += 1,
                Tick::Timer => counts.1 += 1,
            }
        }
        counts
    }

    #[test_case(500, 501 ; "slow")]
    #[test_case(1000, 1001 ; "classic")]
    #[test_case(4000, 4001 ; "fast")]
    fn timers_run_at_sixty_hz_whatever_the_instruction_rate(hz: u32, instructions: usize) {
        let mut clock = Clock::new(hz);
        assert_eq!(count_until(&mut clock, Duration::from_secs(1)), (instructions, 60));
    }

    #[test]
    fn nothing_is_due_before_its_deadline() {
        let mut clock = Clock::new(1000);
        assert_eq!(clock.next_due(Duration::from_secs(0)), Some(Tick::Instruction));
        assert_eq!(clock.next_due(Duration::from_micros(999)), None);
        assert_eq!(clock.next_deadline(), Duration::from_millis(1));
    }

    #[test]
    fn late_callers_catch_up_in_order() {
        let mut clock = Clock::new(120);
        let mut ticks = Vec::new();
        while let Some(tick) = clock.next_due(Duration::from_millis(40)) {
            ticks.push(tick);
        }
        // Instructions at 0, 8.3, 16.6, 25, 33.3 ms; timers at 16.6, 33.3 ms
        assert_eq!(
            ticks,
            vec![
                Tick::Instruction,
                Tick::Instruction,
                Tick::Timer,
                Tick::Instruction,
                Tick::Instruction,
                Tick::Timer,
                Tick::Instruction,
            ]
        );
    }

    #[test]
    fn zero_rate_does_not_divide_by_zero() {
        assert_eq!(Clock::new(0).instruction_period(), Duration::from_secs(1));
    }

    #[test]
    fn rates_above_a_gigahertz_still_make_progress() {
        let mut clock = Clock::new(2_000_000_000);
        assert_eq!(clock.instruction_period(), Duration::from_nanos(1));
        assert_eq!(count_until(&mut clock, Duration::from_nanos(10)), (11, 0));
        assert_eq!(clock.next_deadline(), Duration::from_nanos(11));
    }
}
