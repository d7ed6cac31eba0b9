use hodlem_proofs::error::CryptoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HodlemError>;

#[derive(Error, Debug)]
pub enum HodlemError {
    #[error("wrong phase")]
    WrongPhase,

    #[error("unauthorised")]
    Unauthorised,

    #[error("wrong turn")]
    WrongTurn,

    #[error("invalid seatIndex")]
    InvalidSeatIndex,

    #[error("invalid startsWith")]
    InvalidStartsWith,

    #[error("invalid untilLeft")]
    InvalidUntilLeft,

    #[error("incorrect bond + buyIn")]
    IncorrectValue,

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("invalid players")]
    InvalidPlayers,

    #[error("invalid proof")]
    InvalidProof,

    #[error("invalid shuffle proof")]
    InvalidShuffleProof,

    #[error("wrong commit")]
    WrongCommit,

    #[error("already submitted")]
    AlreadySubmitted,

    #[error("not submitted")]
    NotSubmitted,

    #[error("commitments pending")]
    CommitmentsPending,

    #[error("batch incomplete")]
    BatchIncomplete,

    #[error("below minimum")]
    BelowMinimum,

    #[error("size exceeds stack")]
    SizeExceedsStack,

    #[error("not a bet or raise")]
    NotABetOrRaise,

    #[error("deadline not passed")]
    DeadlineNotPassed,

    #[error("seat taken")]
    SeatTaken,

    #[error("already seated")]
    AlreadySeated,

    #[error("unknown table {0}")]
    UnknownTable(u64),

    #[error("unknown deck {0}")]
    UnknownDeck(u64),

    #[error("invalid card index {0}")]
    InvalidCardIndex(usize),

    #[error("malformed wire data: {0}")]
    Wire(#[from] CryptoError),

    #[error("malformed config: {0}")]
    Config(#[from] serde_json::Error),
}
