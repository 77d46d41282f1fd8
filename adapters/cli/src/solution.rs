#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use nqueens_core::SquareCoord;
use serde::{Deserialize, Serialize};

const SOLUTION_DOMAIN: &str = "queens";
const SOLUTION_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded solution payload.
pub(crate) const SOLUTION_HEADER: &str = "queens:v1";
/// Delimiter used to separate the prefix, board dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of the queen placements solving a board of a given size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct SolutionSnapshot {
    /// Edge length of the board the placements belong to.
    pub size: u32,
    /// Squares occupied by queens, in placement order.
    pub placements: Vec<SquareCoord>,
}

impl SolutionSnapshot {
    /// Encodes the snapshot into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSolution {
            placements: self.placements.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("solution serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SOLUTION_HEADER}:{}x{}:{encoded}", self.size, self.size)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, SolutionTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SolutionTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(SolutionTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(SolutionTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(SolutionTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(SolutionTransferError::MissingPayload)?;

        if domain != SOLUTION_DOMAIN {
            return Err(SolutionTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SOLUTION_VERSION {
            return Err(SolutionTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let size = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(SolutionTransferError::InvalidEncoding)?;
        let decoded: SerializableSolution =
            serde_json::from_slice(&bytes).map_err(SolutionTransferError::InvalidPayload)?;

        validate_placements(size, &decoded.placements)?;

        Ok(Self {
            size,
            placements: decoded.placements,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSolution {
    placements: Vec<SquareCoord>,
}

/// Errors that can occur while decoding solution transfer strings.
#[derive(Debug)]
pub(crate) enum SolutionTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded solution.
    MissingPrefix,
    /// The encoded solution did not contain a version segment.
    MissingVersion,
    /// The encoded solution did not include board dimensions.
    MissingDimensions,
    /// The encoded solution did not include the payload segment.
    MissingPayload,
    /// The encoded solution used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded solution used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The board dimensions could not be parsed from the encoded solution.
    InvalidDimensions(String),
    /// The board dimensions described a non-square board.
    NonSquareDimensions(u32, u32),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// A placement fell outside the encoded board.
    PlacementOutOfBounds(SquareCoord),
    /// The same square appeared twice among the placements.
    DuplicatePlacement(SquareCoord),
    /// More placements were encoded than the board has queens.
    TooManyPlacements(usize),
}

impl fmt::Display for SolutionTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "solution payload was empty"),
            Self::MissingPrefix => write!(f, "solution string is missing the prefix"),
            Self::MissingVersion => write!(f, "solution string is missing the version"),
            Self::MissingDimensions => {
                write!(f, "solution string is missing the board dimensions")
            }
            Self::MissingPayload => write!(f, "solution string is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "solution prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "solution version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse board dimensions '{dimensions}'")
            }
            Self::NonSquareDimensions(columns, rows) => {
                write!(f, "board dimensions {columns}x{rows} are not square")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode solution payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse solution payload: {error}")
            }
            Self::PlacementOutOfBounds(square) => write!(
                f,
                "placement ({}, {}) lies outside the board",
                square.row(),
                square.col()
            ),
            Self::DuplicatePlacement(square) => write!(
                f,
                "square ({}, {}) appears more than once",
                square.row(),
                square.col()
            ),
            Self::TooManyPlacements(count) => {
                write!(f, "solution encodes {count} placements, more than the board has queens")
            }
        }
    }
}

impl Error for SolutionTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<u32, SolutionTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| SolutionTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| SolutionTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| SolutionTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(SolutionTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }
    if columns != rows {
        return Err(SolutionTransferError::NonSquareDimensions(columns, rows));
    }

    Ok(columns)
}

fn validate_placements(
    size: u32,
    placements: &[SquareCoord],
) -> Result<(), SolutionTransferError> {
    if placements.len() > size as usize {
        return Err(SolutionTransferError::TooManyPlacements(placements.len()));
    }

    for (index, placement) in placements.iter().enumerate() {
        if placement.row() >= size || placement.col() >= size {
            return Err(SolutionTransferError::PlacementOutOfBounds(*placement));
        }
        if placements[..index].contains(placement) {
            return Err(SolutionTransferError::DuplicatePlacement(*placement));
        }
    }

    Ok(())
}
