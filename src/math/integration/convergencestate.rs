/// Runge 迭代的區域狀態：前一次（n/2）與本次（n）的估計值、n 與迭代次數。
///
/// 以值的形式在迴圈中傳遞，每次加倍產生新的狀態，不與其他呼叫共用。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceState {
    previous: f64,
    current: f64,
    subdivisions: usize,
    iteration: usize
}

impl ConvergenceState {
    /// 第一個估計尚無比較對象，previous 先設為 current
    pub fn new(value: f64, subdivisions: usize) -> ConvergenceState {
        ConvergenceState {
            previous: value,
            current: value,
            subdivisions,
            iteration: 0
        }
    }

    pub fn refined(self, value: f64, subdivisions: usize) -> ConvergenceState {
        ConvergenceState {
            previous: self.current,
            current: value,
            subdivisions,
            iteration: self.iteration + 1
        }
    }

    pub fn previous(&self) -> f64 {
        self.previous
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Runge 誤差估計：|I_h - I_2h| / (2^p - 1)
    pub fn runge_error(&self, order: u32) -> f64 {
        (self.current - self.previous).abs() / runge_denominator(order)
    }

    /// Richardson 外插：I_h + (I_h - I_2h) / (2^p - 1)
    pub fn richardson(&self, order: u32) -> f64 {
        self.current + (self.current - self.previous) / runge_denominator(order)
    }
}

fn runge_denominator(order: u32) -> f64 {
    2.0_f64.powi(order as i32) - 1.0
}
