strong_type!(EntityId, u64);
strong_type!(RunId, u64);
