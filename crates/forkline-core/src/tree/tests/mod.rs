mod mcts_regression_tests;
mod property_stats_tests;
mod selection_tests;
