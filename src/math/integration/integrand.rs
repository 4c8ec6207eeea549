/// 被積函數：單一實數引數的純函數。
///
/// 積分規則只借用被積函數、從不修改它；多個積分可在不同執行緒同時呼叫，
/// 因此要求 `Send + Sync`，且實作不得帶有內部快取或可變狀態。
pub trait Integrand: Send + Sync {
    fn value(&self, x: f64) -> f64;
}

impl <F> Integrand for F where
    F: Fn(f64) -> f64 + Send + Sync {
    fn value(&self, x: f64) -> f64 {
        self(x)
    }
}
