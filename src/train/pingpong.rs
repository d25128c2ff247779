use crate::buffer::WeightBuffer;

/// The current/next weight pair. Each step reads `current` and writes every
/// weight of `next`; `swap` exchanges the two references, never the data.
pub struct PingPong<'a> {
    current: &'a mut WeightBuffer,
    next: &'a mut WeightBuffer,
    swaps: usize,
}

impl<'a> PingPong<'a> {

    pub fn new(weights: &'a mut WeightBuffer, spare: &'a mut WeightBuffer) -> Self {
        assert_eq!(weights.layer_offsets(), spare.layer_offsets());
        PingPong {
            current: weights,
            next: spare,
            swaps: 0,
        }
    }

    #[inline]
    pub fn pair(&mut self) -> (&WeightBuffer, &mut WeightBuffer) {
        (&*self.current, &mut *self.next)
    }

    #[inline]
    pub fn current(&self) -> &WeightBuffer {
        &*self.current
    }

    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.swaps += 1;
    }

    #[inline]
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    /// Leaves the final weights in the caller's buffer, copying once when the
    /// last swap left them in the spare. Returns whether a copy happened.
    pub fn finish(self) -> bool {
        if self.swaps % 2 == 1 {
            self.current.copy_into(self.next);
            true
        } else {
            false
        }
    }

}
