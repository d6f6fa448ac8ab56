use std::rc::Weak;

/// How a single piece of a [`super::PeerSession`] bitfield is updated.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceOp {
    Unset = 0,
    Set = 1,
}

impl TryFrom<u8> for PieceOp {
    type Error = u8;

    /// Any value other than `0` or `1` is not an operation, callers skip
    /// the update.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unset),
            1 => Ok(Self::Set),
            v => Err(v),
        }
    }
}

/// Queue of wire messages of one peer connection, as far as the session
/// needs to know about it.
pub trait MessageDispatcher {
    /// Block requests received from the peer that were not answered yet.
    fn count_outstanding_upload(&self) -> usize;
}

/// Non-owning handle to the dispatcher of a connection. The connection owns
/// the dispatcher, the session only looks at it.
pub type DispatcherRef = Weak<dyn MessageDispatcher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_op_from_u8() {
        assert_eq!(PieceOp::try_from(0), Ok(PieceOp::Unset));
        assert_eq!(PieceOp::try_from(1), Ok(PieceOp::Set));
        assert_eq!(PieceOp::try_from(2), Err(2));
    }
}
