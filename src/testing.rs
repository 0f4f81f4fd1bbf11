//! Fixture builder shared by the unit tests

use rust_decimal::Decimal;

use crate::domain::{
    Bye, ByeType, CompetitorType, Pairing, PairingKind, Player, PlayerAvailability, PlayerId,
    PrizeId, PrizeWinner, Round, RoundId, Season, SeasonData, SeasonPlayer, SeasonPrize,
    SeasonSnapshot, Team, TeamId, TeamPairing, TeamPairingId,
};

pub struct SeasonBuilder {
    data: SeasonData,
    next_id: i64,
}

pub fn round_id(number: i32) -> RoundId {
    100 + number as RoundId
}

impl SeasonBuilder {
    pub fn lone(rounds: i32) -> Self {
        Self::new(rounds, None, CompetitorType::Lone)
    }

    pub fn team(rounds: i32, boards: i32) -> Self {
        Self::new(rounds, Some(boards), CompetitorType::Team)
    }

    fn new(rounds: i32, boards: Option<i32>, competitor_type: CompetitorType) -> Self {
        let season = Season {
            id: 1,
            league_tag: "league".to_string(),
            tag: "s1".to_string(),
            name: "Season 1".to_string(),
            rounds,
            boards,
            is_completed: false,
            competitor_type,
        };
        let rounds = (1..=rounds)
            .map(|number| Round {
                id: round_id(number),
                number,
                is_completed: true,
                publish_pairings: true,
                start_date: None,
                end_date: None,
            })
            .collect();

        Self {
            data: SeasonData {
                season,
                players: Vec::new(),
                season_players: Vec::new(),
                teams: Vec::new(),
                rounds,
                team_pairings: Vec::new(),
                pairings: Vec::new(),
                byes: Vec::new(),
                availability: Vec::new(),
                prizes: Vec::new(),
                prize_winners: Vec::new(),
            },
            next_id: 1000,
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn player(&mut self, username: &str, seed_rating: Option<i32>) -> PlayerId {
        let id = self.next_id();
        self.data.players.push(Player {
            id,
            username: username.to_string(),
            rating: seed_rating,
        });
        self.data.season_players.push(SeasonPlayer {
            player_id: id,
            seed_rating,
            is_active: true,
            late_join_points: Decimal::ZERO,
        });
        id
    }

    pub fn set_inactive(&mut self, player_id: PlayerId) {
        for sp in self.data.season_players.iter_mut() {
            if sp.player_id == player_id {
                sp.is_active = false;
            }
        }
    }

    pub fn late_join_points(&mut self, player_id: PlayerId, points: Decimal) {
        for sp in self.data.season_players.iter_mut() {
            if sp.player_id == player_id {
                sp.late_join_points = points;
            }
        }
    }

    pub fn round_state(&mut self, number: i32, is_completed: bool, publish_pairings: bool) {
        for round in self.data.rounds.iter_mut() {
            if round.number == number {
                round.is_completed = is_completed;
                round.publish_pairings = publish_pairings;
            }
        }
    }

    pub fn complete_season(&mut self) {
        self.data.season.is_completed = true;
    }

    pub fn shuffle_rounds(&mut self) {
        self.data.rounds.reverse();
    }

    pub fn pairing(
        &mut self,
        round_number: i32,
        white: Option<PlayerId>,
        black: Option<PlayerId>,
        result: &str,
    ) -> i64 {
        self.pairing_in_round_id(round_id(round_number), white, black, result)
    }

    pub fn pairing_in_round_id(
        &mut self,
        round_id: RoundId,
        white: Option<PlayerId>,
        black: Option<PlayerId>,
        result: &str,
    ) -> i64 {
        let id = self.next_id();
        let pairing_order = self.data.pairings.len() as i32;
        self.data.pairings.push(Pairing {
            id,
            white,
            black,
            result: result.parse().unwrap(),
            game_link: format!("https://lichess.org/{}", id),
            scheduled_time: None,
            kind: PairingKind::Lone {
                round_id,
                pairing_order,
            },
        });
        id
    }

    pub fn bye(&mut self, round_number: i32, player_id: PlayerId, bye_type: ByeType) {
        let id = self.next_id();
        self.data.byes.push(Bye {
            id,
            round_id: round_id(round_number),
            player_id,
            bye_type,
            player_rank: None,
        });
    }

    pub fn team_entry(&mut self, name: &str) -> TeamId {
        let id = self.next_id();
        let number = self.data.teams.len() as i32 + 1;
        self.data.teams.push(Team {
            id,
            number,
            name: name.to_string(),
        });
        id
    }

    /// Adds a team match; `boards` lists (white team player, black team player,
    /// result from the board's white side) in board order
    pub fn team_match(
        &mut self,
        round_number: i32,
        white_team: TeamId,
        black_team: TeamId,
        boards: &[(PlayerId, PlayerId, &str)],
    ) -> TeamPairingId {
        let team_pairing_id = self.next_id();
        let pairing_order = self.data.team_pairings.len() as i32;
        self.data.team_pairings.push(TeamPairing {
            id: team_pairing_id,
            round_id: round_id(round_number),
            white_team,
            black_team,
            pairing_order,
        });

        for (idx, (white_team_player, black_team_player, result)) in boards.iter().enumerate() {
            let board_number = idx as i32 + 1;
            let (white, black) = if board_number % 2 == 1 {
                (*white_team_player, *black_team_player)
            } else {
                (*black_team_player, *white_team_player)
            };
            let id = self.next_id();
            self.data.pairings.push(Pairing {
                id,
                white: Some(white),
                black: Some(black),
                result: result.parse().unwrap(),
                game_link: format!("https://lichess.org/{}", id),
                scheduled_time: None,
                kind: PairingKind::Team {
                    team_pairing_id,
                    board_number,
                },
            });
        }
        team_pairing_id
    }

    pub fn availability(&mut self, round_number: i32, player_id: PlayerId, is_available: bool) {
        self.data.availability.push(PlayerAvailability {
            round_id: round_id(round_number),
            player_id,
            is_available,
        });
    }

    pub fn prize(&mut self, rank: i32, max_rating: Option<i32>) -> PrizeId {
        let id = self.next_id();
        self.data.prizes.push(SeasonPrize {
            id,
            rank,
            max_rating,
        });
        id
    }

    pub fn winner(&mut self, prize_id: PrizeId, player_id: PlayerId) {
        self.data.prize_winners.push(PrizeWinner {
            prize_id,
            player_id,
        });
    }

    pub fn into_data(self) -> SeasonData {
        self.data
    }

    pub fn build(self) -> SeasonSnapshot {
        SeasonSnapshot::new(self.data).unwrap()
    }
}
