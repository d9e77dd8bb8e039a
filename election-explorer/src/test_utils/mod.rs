pub(crate) mod participants;
