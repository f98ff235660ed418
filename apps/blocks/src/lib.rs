pixcade::arcade_game!(Blocks, "blocks");
